//! # Treatment Plans
//!
//! Placeholder stand-in for clinical decision making. A booked appointment gets one of five
//! canned diagnosis/medicine/advice triples, picked uniformly at random. Nothing about the
//! appointment influences the pick.
use rand::Rng;
use records::models::TreatmentPlan;

pub struct PlanTemplate {
    pub diagnosis: &'static str,
    pub recommended_medicines: [&'static str; 2],
    pub lifestyle_advice: &'static str,
}

pub const PLANS: [PlanTemplate; 5] = [
    PlanTemplate {
        diagnosis: "Migraine",
        recommended_medicines: ["Medicine A", "Medicine B"],
        lifestyle_advice: "Drink more water, sleep early",
    },
    PlanTemplate {
        diagnosis: "Common Cold",
        recommended_medicines: ["Vitamin C", "Rest medication"],
        lifestyle_advice: "Rest well, stay hydrated",
    },
    PlanTemplate {
        diagnosis: "Anxiety",
        recommended_medicines: ["Relaxation therapy", "Mild sedative"],
        lifestyle_advice: "Practice meditation, avoid stress",
    },
    PlanTemplate {
        diagnosis: "Back Pain",
        recommended_medicines: ["Pain relief", "Anti-inflammatory"],
        lifestyle_advice: "Light exercise, proper posture",
    },
    PlanTemplate {
        diagnosis: "Fatigue",
        recommended_medicines: ["Energy supplement", "Vitamin B12"],
        lifestyle_advice: "Regular sleep schedule, balanced diet",
    },
];

impl From<&PlanTemplate> for TreatmentPlan {
    fn from(template: &PlanTemplate) -> Self {
        Self {
            diagnosis: template.diagnosis.to_string(),
            recommended_medicines: template
                .recommended_medicines
                .iter()
                .map(|medicine| medicine.to_string())
                .collect(),
            lifestyle_advice: template.lifestyle_advice.to_string(),
        }
    }
}

pub fn generate<R: Rng>(rng: &mut R) -> TreatmentPlan {
    TreatmentPlan::from(&PLANS[rng.gen_range(0..PLANS.len())])
}

pub fn is_known(plan: &TreatmentPlan) -> bool {
    PLANS.iter().any(|template| TreatmentPlan::from(template) == *plan)
}
