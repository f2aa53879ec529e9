//! Rule-based symptom triage.
//!
//! Maps free-text symptoms to a category, a recommended specialty and a
//! concern level. This is a disclaimed heuristic, not a diagnosis.
//!
//! Categories are tried in catalog order; the first one with a keyword that
//! occurs in the lower-cased text wins. `general` has no keywords and is the
//! fallback.

use serde::Serialize;

use crate::models::enums::{ConcernLevel, Specialty};

pub const DISCLAIMER: &str = "This is NOT a medical diagnosis. Please consult a qualified \
healthcare professional for accurate diagnosis and treatment.";

/// Children under this age get mild concerns escalated.
const CHILD_AGE_BELOW: u32 = 5;
/// Adults over this age get mild concerns escalated.
const SENIOR_AGE_ABOVE: u32 = 65;

#[derive(Debug, Serialize)]
pub struct TriageCategory {
    pub name: &'static str,
    /// Human label for a category picker.
    pub label: &'static str,
    pub keywords: &'static [&'static str],
    pub specialty: Specialty,
    pub base_concern: ConcernLevel,
    pub diet_tips: &'static [&'static str],
    pub care_instructions: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct TriageResult {
    pub category: &'static str,
    pub concern_level: ConcernLevel,
    pub specialty: Specialty,
    pub recommended_specialist: &'static str,
    pub diet_tips: &'static [&'static str],
    pub care_instructions: &'static [&'static str],
    pub disclaimer: &'static str,
}

// ═══════════════════════════════════════════════════════════
// Catalog (priority order)
// ═══════════════════════════════════════════════════════════

pub static CATALOG: [TriageCategory; 9] = [
    TriageCategory {
        name: "fever",
        label: "Fever",
        keywords: &["fever", "high temperature", "hot", "burning", "chills"],
        specialty: Specialty::General,
        base_concern: ConcernLevel::Moderate,
        diet_tips: &[
            "Drink plenty of fluids (water, coconut water, herbal teas)",
            "Eat light, easily digestible foods",
            "Include vitamin C rich fruits like oranges and lemons",
            "Avoid heavy, fried, or spicy foods",
        ],
        care_instructions: &[
            "Get adequate rest and sleep",
            "Monitor your temperature regularly",
            "Use cool compresses if temperature is very high",
            "Take prescribed fever medication as directed",
            "If fever persists for more than 3 days or goes above 103°F, consult a doctor immediately",
        ],
    },
    TriageCategory {
        name: "cough_cold",
        label: "Cough/Cold",
        keywords: &["cough", "cold", "runny nose", "sneezing", "sore throat", "congestion"],
        specialty: Specialty::General,
        base_concern: ConcernLevel::Mild,
        diet_tips: &[
            "Drink warm water, herbal teas, and soups",
            "Consume honey and ginger tea",
            "Eat vitamin C rich foods",
            "Avoid cold drinks and ice cream",
            "Include turmeric milk before bed",
        ],
        care_instructions: &[
            "Get plenty of rest",
            "Gargle with warm salt water for sore throat",
            "Use steam inhalation for congestion",
            "Keep yourself warm",
            "If symptoms worsen or persist beyond a week, consult a doctor",
        ],
    },
    TriageCategory {
        name: "stomach_issues",
        label: "Stomach Issues",
        keywords: &[
            "stomach", "abdominal", "belly", "nausea", "vomiting", "diarrhea", "constipation",
            "acidity",
        ],
        specialty: Specialty::Gastroenterology,
        base_concern: ConcernLevel::Moderate,
        diet_tips: &[
            "Eat bland foods like rice, bananas, toast",
            "Stay hydrated with ORS or coconut water",
            "Avoid spicy, oily, and fried foods",
            "Eat small, frequent meals",
            "Include probiotics like yogurt",
        ],
        care_instructions: &[
            "Rest and avoid strenuous activities",
            "Monitor for signs of dehydration",
            "Avoid self-medication for severe pain",
            "If there is blood in stool/vomit or severe pain, seek immediate medical help",
            "Keep track of what you eat and symptoms",
        ],
    },
    TriageCategory {
        name: "headache",
        label: "Headache",
        keywords: &["headache", "head pain", "migraine", "head ache"],
        specialty: Specialty::Neurology,
        base_concern: ConcernLevel::Mild,
        diet_tips: &[
            "Stay well hydrated",
            "Avoid caffeine and alcohol",
            "Eat regular, balanced meals",
            "Include magnesium-rich foods like nuts and seeds",
            "Avoid processed foods and MSG",
        ],
        care_instructions: &[
            "Rest in a quiet, dark room",
            "Apply cold or warm compress to head",
            "Practice relaxation techniques",
            "Maintain regular sleep schedule",
            "If headaches are severe, frequent, or accompanied by vision changes, consult a doctor",
        ],
    },
    TriageCategory {
        name: "chest_discomfort",
        label: "Chest Discomfort",
        keywords: &["chest", "chest pain", "breathing", "shortness of breath", "heart"],
        specialty: Specialty::Cardiology,
        base_concern: ConcernLevel::Severe,
        diet_tips: &[
            "Avoid heavy meals",
            "Reduce salt and fat intake",
            "Stay hydrated",
            "Avoid caffeine and stimulants",
        ],
        care_instructions: &[
            "IMPORTANT: Chest pain can be serious",
            "If you experience severe chest pain, call emergency services (112/108) immediately",
            "Do not ignore chest discomfort, especially with sweating, nausea, or arm pain",
            "Rest and avoid physical exertion",
            "Seek immediate medical attention",
        ],
    },
    TriageCategory {
        name: "skin_issues",
        label: "Skin Issues",
        keywords: &["skin", "rash", "itching", "allergy", "redness", "acne", "pimples"],
        specialty: Specialty::Dermatology,
        base_concern: ConcernLevel::Mild,
        diet_tips: &[
            "Drink plenty of water for hydration",
            "Include fruits and vegetables",
            "Avoid oily and junk food",
            "Reduce sugar intake",
            "Include foods rich in Omega-3 fatty acids",
        ],
        care_instructions: &[
            "Keep the affected area clean",
            "Avoid scratching",
            "Use mild, fragrance-free soaps",
            "Apply moisturizer if skin is dry",
            "Avoid known allergens",
            "If rash spreads rapidly or is painful, consult a doctor",
        ],
    },
    TriageCategory {
        name: "joint_pain",
        label: "Joint/Bone Pain",
        keywords: &["joint", "bone", "arthritis", "knee", "back pain", "muscle pain"],
        specialty: Specialty::Orthopedics,
        base_concern: ConcernLevel::Moderate,
        diet_tips: &[
            "Include anti-inflammatory foods",
            "Consume foods rich in calcium and vitamin D",
            "Include turmeric and ginger in diet",
            "Stay hydrated",
            "Maintain healthy weight",
        ],
        care_instructions: &[
            "Apply ice or heat therapy as appropriate",
            "Rest the affected area",
            "Do gentle stretching exercises",
            "Maintain good posture",
            "If pain is severe or limits movement, consult a doctor",
        ],
    },
    TriageCategory {
        name: "mental_health",
        label: "Mental Health / Stress",
        keywords: &[
            "anxiety", "depression", "stress", "mental", "sleep issues", "insomnia", "panic",
        ],
        specialty: Specialty::Psychiatry,
        base_concern: ConcernLevel::Moderate,
        diet_tips: &[
            "Eat balanced, regular meals",
            "Limit caffeine and sugar",
            "Include foods rich in Omega-3",
            "Avoid alcohol",
            "Stay hydrated",
        ],
        care_instructions: &[
            "Practice relaxation techniques like deep breathing",
            "Maintain regular sleep schedule",
            "Exercise regularly",
            "Stay connected with friends and family",
            "Seek professional help - mental health is important",
            "If you have thoughts of self-harm, seek immediate help",
        ],
    },
    TriageCategory {
        name: "general",
        label: "General / Other",
        keywords: &[],
        specialty: Specialty::General,
        base_concern: ConcernLevel::Mild,
        diet_tips: &[
            "Eat a balanced diet with fruits and vegetables",
            "Stay hydrated",
            "Get adequate sleep",
            "Exercise regularly",
        ],
        care_instructions: &[
            "Monitor your symptoms",
            "Get adequate rest",
            "Maintain good hygiene",
            "Consult a doctor if symptoms persist or worsen",
        ],
    },
];

fn fallback() -> &'static TriageCategory {
    &CATALOG[CATALOG.len() - 1]
}

// ═══════════════════════════════════════════════════════════
// Engine
// ═══════════════════════════════════════════════════════════

/// Looks up a category by its exact name.
pub fn find_category(name: &str) -> Option<&'static TriageCategory> {
    CATALOG.iter().find(|c| c.name == name)
}

/// First category in priority order with a keyword contained in `text`.
pub fn match_category(text: &str) -> &'static TriageCategory {
    let lowered = text.to_lowercase();
    CATALOG
        .iter()
        .find(|c| c.keywords.iter().any(|k| lowered.contains(k)))
        .unwrap_or_else(fallback)
}

pub fn effective_concern(base: ConcernLevel, age: u32) -> ConcernLevel {
    let vulnerable = age < CHILD_AGE_BELOW || age > SENIOR_AGE_ABOVE;
    match base {
        ConcernLevel::Mild if vulnerable => ConcernLevel::Moderate,
        other => other,
    }
}

/// Classifies `text`. A known `explicit_category` wins over keyword search;
/// an unknown one is ignored.
pub fn classify(text: &str, age: u32, explicit_category: Option<&str>) -> TriageResult {
    let category = match explicit_category.and_then(find_category) {
        Some(category) => category,
        None => match_category(text),
    };
    let concern_level = effective_concern(category.base_concern, age);

    tracing::debug!(
        category = category.name,
        concern = %concern_level,
        explicit = explicit_category.is_some(),
        "Symptoms triaged"
    );

    TriageResult {
        category: category.name,
        concern_level,
        specialty: category.specialty,
        recommended_specialist: category.specialty.practitioner_title(),
        diet_tips: category.diet_tips,
        care_instructions: category.care_instructions,
        disclaimer: DISCLAIMER,
    }
}

/// The full catalog, in priority order.
pub fn categories() -> &'static [TriageCategory] {
    &CATALOG
}
