/// Prediction identifiers are opaque strings assigned by the backend.
pub type PredictionId = String;
