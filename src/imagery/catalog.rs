/// Static asteroid imagery: well-known bodies plus one representative image per composition type

use crate::domain::AsteroidType;

pub struct CatalogEntry {
    pub name: &'static str,
    pub url: &'static str,
    pub description: &'static str,
    pub source: &'static str,
}

/// Lookup order matters for catalog-number matches: first hit wins.
pub const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        name: "Ceres",
        url: "https://upload.wikimedia.org/wikipedia/commons/7/76/Ceres_-_RC3_-_Haulani_Crater_%2822381131691%29_%28cropped%29.jpg",
        description: "Dwarf planet Ceres photographed by NASA's Dawn spacecraft",
        source: "NASA/JPL-Caltech/UCLA/MPS/DLR/IDA",
    },
    CatalogEntry {
        name: "Vesta",
        url: "https://upload.wikimedia.org/wikipedia/commons/c/cc/Vesta_in_natural_color.jpg",
        description: "Asteroid Vesta in natural color, imaged by Dawn spacecraft",
        source: "NASA/JPL-Caltech/UCLA/MPS/DLR/IDA",
    },
    CatalogEntry {
        name: "Bennu",
        url: "https://upload.wikimedia.org/wikipedia/commons/8/82/Bennu_mosaic_OSIRIS-REx.jpg",
        description: "Near-Earth asteroid Bennu photographed by OSIRIS-REx spacecraft",
        source: "NASA/Goddard/University of Arizona",
    },
    CatalogEntry {
        name: "Ryugu",
        url: "https://upload.wikimedia.org/wikipedia/commons/1/12/Ryugu_true_color.jpg",
        description: "Asteroid Ryugu in true color, photographed by Hayabusa2",
        source: "JAXA, University of Tokyo, Kochi University, Rikkyo University, Nagoya University, Chiba Institute of Technology, Meiji University, University of Aizu, AIST",
    },
    CatalogEntry {
        name: "Itokawa",
        url: "https://upload.wikimedia.org/wikipedia/commons/f/f9/Itokawa8_hayabusa_1210.jpg",
        description: "Near-Earth asteroid Itokawa photographed by Hayabusa spacecraft",
        source: "JAXA",
    },
    CatalogEntry {
        name: "Eros",
        url: "https://upload.wikimedia.org/wikipedia/commons/5/5e/433eros.jpg",
        description: "Near-Earth asteroid 433 Eros photographed by NEAR Shoemaker",
        source: "NASA/Johns Hopkins University Applied Physics Laboratory",
    },
    CatalogEntry {
        name: "Gaspra",
        url: "https://upload.wikimedia.org/wikipedia/commons/5/54/951_Gaspra.jpg",
        description: "Asteroid 951 Gaspra photographed by Galileo spacecraft",
        source: "NASA/JPL",
    },
    CatalogEntry {
        name: "Ida",
        url: "https://upload.wikimedia.org/wikipedia/commons/b/bf/243_ida.jpg",
        description: "Asteroid 243 Ida and its moon Dactyl, photographed by Galileo",
        source: "NASA/JPL",
    },
    CatalogEntry {
        name: "Mathilde",
        url: "https://upload.wikimedia.org/wikipedia/commons/a/af/253_mathilde_%28crop%29.jpg",
        description: "Asteroid 253 Mathilde photographed by NEAR Shoemaker",
        source: "NASA/Johns Hopkins University Applied Physics Laboratory",
    },
    CatalogEntry {
        name: "Steins",
        url: "https://upload.wikimedia.org/wikipedia/commons/9/98/Asteroid_2867_Steins.jpg",
        description: "Asteroid 2867 Steins photographed by Rosetta spacecraft",
        source: "ESA ©2008 MPS for OSIRIS Team",
    },
    CatalogEntry {
        name: "Lutetia",
        url: "https://upload.wikimedia.org/wikipedia/commons/0/0b/21_Lutetia_from_Rosetta.jpg",
        description: "Asteroid 21 Lutetia photographed by Rosetta spacecraft",
        source: "ESA ©2010 MPS for OSIRIS Team",
    },
    CatalogEntry {
        name: "Pallas",
        url: "https://upload.wikimedia.org/wikipedia/commons/1/1c/2_Pallas_Hubble.jpg",
        description: "Asteroid 2 Pallas imaged by Hubble Space Telescope",
        source: "NASA/ESA/STScI",
    },
    CatalogEntry {
        name: "Hygiea",
        url: "https://upload.wikimedia.org/wikipedia/commons/5/5c/10_Hygiea_VLT.jpg",
        description: "Asteroid 10 Hygiea imaged by Very Large Telescope",
        source: "ESO/P. Vernazza et al./MISTRAL algorithm (ONERA/CNRS)",
    },
    CatalogEntry {
        name: "Apophis",
        url: "https://upload.wikimedia.org/wikipedia/commons/f/f2/99942_Apophis_radar_2012-2013.jpg",
        description: "Near-Earth asteroid 99942 Apophis radar image",
        source: "NASA/JPL-Caltech",
    },
    CatalogEntry {
        name: "Toutatis",
        url: "https://upload.wikimedia.org/wikipedia/commons/e/e1/4179_Toutatis.jpg",
        description: "Near-Earth asteroid 4179 Toutatis radar image",
        source: "NASA/JPL",
    },
    CatalogEntry {
        name: "Kleopatra",
        url: "https://upload.wikimedia.org/wikipedia/commons/5/5c/216_Kleopatra_VLT.jpg",
        description: "Asteroid 216 Kleopatra imaged by Very Large Telescope",
        source: "ESO/Vernazza, Marchis et al./MISTRAL algorithm (ONERA/CNRS)",
    },
];

pub fn by_name(name: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|e| e.name == name)
}

pub fn by_catalog_number(number: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|e| e.description.contains(number))
}

/// Published spectral classes, matched as substrings of the upper-cased name
const KNOWN_TYPES: &[(&str, AsteroidType)] = &[
    ("BENNU", AsteroidType::Carbonaceous),
    ("RYUGU", AsteroidType::Carbonaceous),
    ("CERES", AsteroidType::Carbonaceous),
    ("MATHILDE", AsteroidType::Carbonaceous),
    ("EROS", AsteroidType::Silicaceous),
    ("GASPRA", AsteroidType::Silicaceous),
    ("IDA", AsteroidType::Silicaceous),
    ("ITOKAWA", AsteroidType::Silicaceous),
    ("TOUTATIS", AsteroidType::Silicaceous),
    ("PSYCHE", AsteroidType::Metallic),
    ("PALLAS", AsteroidType::Metallic),
    ("KLEOPATRA", AsteroidType::Metallic),
    ("VESTA", AsteroidType::Basaltic),
    ("STEINS", AsteroidType::Mixed),
    ("LUTETIA", AsteroidType::Mixed),
];

/// Composition type used to pick a representative image.
///
/// Unknown names are bucketed by catalog number with a fixed hash, so the
/// same object always gets the same type while the spread across numbers
/// follows the rough main-belt distribution.
pub fn asteroid_type(name: &str, catalog_number: Option<u64>) -> AsteroidType {
    let upper = name.to_uppercase();
    if let Some((_, kind)) = KNOWN_TYPES.iter().find(|(known, _)| upper.contains(known)) {
        return *kind;
    }

    let number = catalog_number.unwrap_or(0);
    let bucket = stable_bucket(number);
    match number {
        n if (1..100).contains(&n) => {
            if bucket < 40 {
                AsteroidType::Carbonaceous
            } else {
                AsteroidType::Silicaceous
            }
        }
        n if (100..1000).contains(&n) => {
            if bucket < 60 {
                AsteroidType::Silicaceous
            } else {
                AsteroidType::Carbonaceous
            }
        }
        n if n > 100_000 => {
            if bucket < 70 {
                AsteroidType::Silicaceous
            } else {
                AsteroidType::Carbonaceous
            }
        }
        _ => AsteroidType::Silicaceous,
    }
}

/// splitmix64 finalizer folded into 0..100
fn stable_bucket(n: u64) -> u64 {
    let mut z = n.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    (z ^ (z >> 31)) % 100
}

pub struct RepresentativeImage {
    pub url: &'static str,
    pub description: &'static str,
    pub source: &'static str,
}

pub fn representative(kind: AsteroidType) -> RepresentativeImage {
    match kind {
        AsteroidType::Carbonaceous => RepresentativeImage {
            url: "https://upload.wikimedia.org/wikipedia/commons/8/82/Bennu_mosaic_OSIRIS-REx.jpg",
            description: "Representative C-type (carbonaceous) asteroid - dark and carbon-rich",
            source: "NASA/Goddard/University of Arizona (Representative)",
        },
        AsteroidType::Silicaceous => RepresentativeImage {
            url: "https://upload.wikimedia.org/wikipedia/commons/5/5e/433eros.jpg",
            description: "Representative S-type (silicaceous) asteroid - stony composition",
            source: "NASA/Johns Hopkins APL (Representative)",
        },
        AsteroidType::Metallic => RepresentativeImage {
            url: "https://upload.wikimedia.org/wikipedia/commons/1/1c/2_Pallas_Hubble.jpg",
            description: "Representative M-type (metallic) asteroid - metal-rich composition",
            source: "NASA/ESA/STScI (Representative)",
        },
        AsteroidType::Basaltic => RepresentativeImage {
            url: "https://upload.wikimedia.org/wikipedia/commons/c/cc/Vesta_in_natural_color.jpg",
            description: "Representative V-type (basaltic) asteroid - volcanic composition",
            source: "NASA/JPL-Caltech/UCLA/MPS/DLR/IDA (Representative)",
        },
        AsteroidType::Mixed => RepresentativeImage {
            url: "https://upload.wikimedia.org/wikipedia/commons/f/f9/Itokawa8_hayabusa_1210.jpg",
            description: "Representative X-type asteroid - mixed composition",
            source: "JAXA (Representative)",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_sixteen_unique_names() {
        assert_eq!(CATALOG.len(), 16);
        for (i, a) in CATALOG.iter().enumerate() {
            assert!(CATALOG[i + 1..].iter().all(|b| b.name != a.name), "{} twice", a.name);
            assert!(a.url.starts_with("https://"));
            assert!(!a.source.is_empty());
        }
    }

    #[test]
    fn name_lookup_is_case_sensitive() {
        assert!(by_name("Bennu").is_some());
        assert!(by_name("bennu").is_none());
    }

    #[test]
    fn catalog_number_lookup_scans_descriptions_in_order() {
        assert_eq!(by_catalog_number("433").map(|e| e.name), Some("Eros"));
        assert_eq!(by_catalog_number("99942").map(|e| e.name), Some("Apophis"));
        // "Hayabusa2" in the Ryugu entry
        assert_eq!(by_catalog_number("2").map(|e| e.name), Some("Ryugu"));
        assert!(by_catalog_number("31337").is_none());
    }

    #[test]
    fn known_names_map_to_published_types() {
        assert_eq!(asteroid_type("Bennu", None), AsteroidType::Carbonaceous);
        assert_eq!(asteroid_type("16 Psyche", Some(16)), AsteroidType::Metallic);
        assert_eq!(asteroid_type("vesta family member", None), AsteroidType::Basaltic);
        assert_eq!(asteroid_type("Lutetia", None), AsteroidType::Mixed);
    }

    #[test]
    fn unknown_names_default_to_stony() {
        assert_eq!(asteroid_type("LF3", None), AsteroidType::Silicaceous);
        assert_eq!(asteroid_type("LF3", Some(5_000)), AsteroidType::Silicaceous);
    }

    #[test]
    fn numeric_heuristic_is_deterministic() {
        for n in [1u64, 42, 99, 150, 999, 100_001, 3_542_519] {
            let first = asteroid_type("Unnamed", Some(n));
            for _ in 0..5 {
                assert_eq!(asteroid_type("Unnamed", Some(n)), first);
            }
        }
    }

    #[test]
    fn numeric_heuristic_keeps_approximate_distribution() {
        let carbonaceous = |range: std::ops::Range<u64>| {
            let total = range.end - range.start;
            let c = range
                .filter(|n| asteroid_type("Unnamed", Some(*n)) == AsteroidType::Carbonaceous)
                .count() as f64;
            c / total as f64
        };

        let early = carbonaceous(1..100);
        let middle = carbonaceous(100..1000);
        let modern = carbonaceous(100_001..110_001);
        assert!((0.2..0.6).contains(&early), "early {early}");
        assert!((0.3..0.5).contains(&middle), "middle {middle}");
        assert!((0.25..0.35).contains(&modern), "modern {modern}");
    }

    #[test]
    fn every_type_has_a_representative_image() {
        for kind in [
            AsteroidType::Carbonaceous,
            AsteroidType::Silicaceous,
            AsteroidType::Metallic,
            AsteroidType::Basaltic,
            AsteroidType::Mixed,
        ] {
            let image = representative(kind);
            assert!(image.url.starts_with("https://"));
            assert!(image.source.ends_with("(Representative)"));
        }
    }
}
