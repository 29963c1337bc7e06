use rand::{seq::SliceRandom, Rng};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize)]
pub struct Disease {
    pub name: &'static str,
    pub crops: &'static [&'static str],
    pub severity: Severity,
    pub symptoms: &'static str,
    pub treatment: &'static str,
    pub prevention: &'static str,
    pub recovery: &'static str,
}

pub static DISEASES: &[Disease] = &[
    Disease {
        name: "Powdery Mildew",
        crops: &["Wheat", "Barley"],
        severity: Severity::High,
        symptoms: "White powder-like coating on leaves",
        treatment: "Use sulfur fungicide (weekly spray)",
        prevention: "Ensure good air circulation, avoid overhead watering",
        recovery: "7-10 days",
    },
    Disease {
        name: "Leaf Spot",
        crops: &["Rice", "Corn"],
        severity: Severity::Medium,
        symptoms: "Brown spots with yellow halos on leaves",
        treatment: "Apply copper fungicide",
        prevention: "Remove infected leaves, rotate crops",
        recovery: "10-14 days",
    },
    Disease {
        name: "Late Blight",
        crops: &["Potato", "Tomato"],
        severity: Severity::Critical,
        symptoms: "Water-soaked lesions on stems and leaves",
        treatment: "Remove infected plants immediately, apply fungicide",
        prevention: "Use disease-resistant varieties, proper spacing",
        recovery: "14-21 days",
    },
    Disease {
        name: "Yellow Mosaic Virus",
        crops: &["Beans", "Okra"],
        severity: Severity::High,
        symptoms: "Yellow mottling and mosaic pattern on leaves",
        treatment: "Use resistant varieties, control aphid vectors",
        prevention: "Control aphids with neem oil",
        recovery: "No cure - preventive only",
    },
    Disease {
        name: "Fruit Rot",
        crops: &["Cotton", "Chili"],
        severity: Severity::Medium,
        symptoms: "Soft, watery lesions on fruits",
        treatment: "Improve soil drainage, reduce humidity",
        prevention: "Mulching, avoid waterlogging",
        recovery: "7-10 days",
    },
    Disease {
        name: "Root Rot",
        crops: &["Tomato", "Pepper"],
        severity: Severity::Critical,
        symptoms: "Plant wilting, dark roots, stunted growth",
        treatment: "Sterilize soil, drench with fungicide",
        prevention: "Use well-drained soil, avoid overwatering",
        recovery: "21+ days",
    },
];

/// Mock detection result; nothing is inferred from any image.
#[derive(Debug, Clone, Serialize)]
pub struct Detection {
    pub disease: &'static str,
    pub crops: &'static [&'static str],
    pub severity: Severity,
    pub confidence: f64, // percent, one decimal
    pub symptoms: &'static str,
    pub treatment: &'static str,
    pub prevention: &'static str,
    pub recovery: &'static str,
}

fn affects(disease: &Disease, crop: &str) -> bool {
    disease.crops.iter().any(|c| c.eq_ignore_ascii_case(crop))
}

/// Picks a catalog entry at random, preferring ones that affect `crop_hint`.
pub fn detect<R: Rng>(rng: &mut R, crop_hint: Option<&str>) -> Detection {
    let hint = crop_hint.map(str::trim).filter(|c| !c.is_empty());
    let matching: Vec<&Disease> = match hint {
        Some(crop) => DISEASES.iter().filter(|d| affects(d, crop)).collect(),
        None => Vec::new(),
    };
    let pool: Vec<&Disease> = if matching.is_empty() {
        DISEASES.iter().collect()
    } else {
        matching
    };

    // DISEASES is a non-empty static table.
    let picked = pool.choose(rng).copied().unwrap_or(&DISEASES[0]);
    let confidence = ((89.0 + rng.gen::<f64>() * 9.9) * 10.0).round() / 10.0;

    Detection {
        disease: picked.name,
        crops: picked.crops,
        severity: picked.severity,
        confidence,
        symptoms: picked.symptoms,
        treatment: picked.treatment,
        prevention: picked.prevention,
        recovery: picked.recovery,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn catalog_has_six_entries() {
        assert_eq!(DISEASES.len(), 6);
    }

    #[test]
    fn hint_restricts_candidates() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let d = detect(&mut rng, Some("tomato"));
            assert!(d.disease == "Late Blight" || d.disease == "Root Rot");
        }
    }

    #[test]
    fn unknown_hint_falls_back_to_whole_catalog() {
        let mut rng = StdRng::seed_from_u64(11);
        let d = detect(&mut rng, Some("Dragonfruit"));
        assert!(DISEASES.iter().any(|x| x.name == d.disease));
    }

    #[test]
    fn confidence_stays_in_range_with_one_decimal() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let c = detect(&mut rng, None).confidence;
            assert!((89.0..=98.9).contains(&c), "{c}");
            assert!(((c * 10.0).round() - c * 10.0).abs() < 1e-9);
        }
    }
}
