use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The full examination sheet. At most one row per visit; saving again
/// updates the existing row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicalExam {
    pub id: Uuid,
    pub visit_id: Uuid,
    // Vitals
    pub temperature: Option<f64>,
    pub respiration_rate: Option<String>,
    pub heart_rate: Option<String>,
    // General examination
    pub weight: Option<f64>,
    pub mucous_membrane: Option<String>,
    pub dehydration: Option<String>,
    pub body_condition: Option<String>,
    pub appetite: Option<String>,
    pub gait: Option<String>,
    pub urination: Option<String>,
    pub stool: Option<String>,
    // Per-system findings: normal/abnormal plus notes when abnormal
    pub alimentary: Option<String>,
    pub alimentary_notes: Option<String>,
    pub respiratory: Option<String>,
    pub respiratory_notes: Option<String>,
    pub cardiovascular: Option<String>,
    pub cardiovascular_notes: Option<String>,
    pub urogenital: Option<String>,
    pub urogenital_notes: Option<String>,
    pub gynecology: Option<String>,
    pub gynecology_notes: Option<String>,
    pub skin: Option<String>,
    pub skin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpsertExamRequest {
    pub temperature: Option<f64>,
    pub respiration_rate: Option<String>,
    pub heart_rate: Option<String>,
    pub weight: Option<f64>,
    pub mucous_membrane: Option<String>,
    pub dehydration: Option<String>,
    pub body_condition: Option<String>,
    pub appetite: Option<String>,
    pub gait: Option<String>,
    pub urination: Option<String>,
    pub stool: Option<String>,
    pub alimentary: Option<String>,
    pub alimentary_notes: Option<String>,
    pub respiratory: Option<String>,
    pub respiratory_notes: Option<String>,
    pub cardiovascular: Option<String>,
    pub cardiovascular_notes: Option<String>,
    pub urogenital: Option<String>,
    pub urogenital_notes: Option<String>,
    pub gynecology: Option<String>,
    pub gynecology_notes: Option<String>,
    pub skin: Option<String>,
    pub skin_notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnosis {
    pub id: Uuid,
    pub visit_id: Uuid,
    pub test_type: String,
    pub result: Option<String>,
    pub notes: Option<String>,
    pub report_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDiagnosisRequest {
    pub test_type: String,
    pub result: Option<String>,
    pub notes: Option<String>,
    pub report_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Treatment {
    pub id: Uuid,
    pub visit_id: Uuid,
    pub category: String,
    pub medicine_name: String,
    pub dosage: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTreatmentRequest {
    pub category: String,
    pub medicine_name: String,
    pub dosage: Option<String>,
    pub notes: Option<String>,
}
