use std::io::Read;

use ndarray::Array2;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    batch::MaskBatch,
    error::{OverlayError, Result},
};

/// One probability mask as sent by the segmentation service: either a plain
/// `H x W` grid or a `1 x H x W` grid with a redundant channel level.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(untagged)]
pub enum MaskGrid {
    Plane(Vec<Vec<f32>>),
    Channels(Vec<Vec<Vec<f32>>>),
}

impl MaskGrid {
    fn into_plane(self, index: usize) -> Result<Array2<f32>> {
        match self {
            MaskGrid::Plane(rows) => rows_to_array(rows, index),
            MaskGrid::Channels(channels) => {
                if channels.len() != 1 {
                    return Err(OverlayError::ShapeMismatch(format!(
                        "mask {index} has {} channels, expected a single one",
                        channels.len()
                    )));
                }
                let rows = channels.into_iter().next().unwrap_or_default();
                rows_to_array(rows, index)
            }
        }
    }
}

fn rows_to_array(rows: Vec<Vec<f32>>, index: usize) -> Result<Array2<f32>> {
    let height = rows.len();
    let width = rows.first().map_or(0, Vec::len);

    if let Some((row, values)) = rows.iter().enumerate().find(|(_, values)| values.len() != width) {
        return Err(OverlayError::ShapeMismatch(format!(
            "mask {index} row {row} has {} values, expected {width}",
            values.len()
        )));
    }

    let flat: Vec<f32> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((height, width), flat)
        .map_err(|e| OverlayError::ShapeMismatch(format!("mask {index}: {e}")))
}

/// Response payload of a segmentation prediction call
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PredictionResponse {
    pub masks: Vec<MaskGrid>,

    /// Detection boxes; carried along but not used for rendering
    #[serde(default)]
    pub boxes: Vec<Vec<f64>>,

    #[serde(default)]
    pub scores: Option<Vec<f32>>,
}

impl PredictionResponse {
    /// Load a response from a JSON string
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a response from any reader producing JSON
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Get the JSON schema of the payload
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(PredictionResponse)
    }

    /// Validate the payload once and convert it into renderer inputs.
    ///
    /// An empty `scores` list is read as "no scores"; any other list must have
    /// one entry per mask.
    pub fn into_batch(self) -> Result<(MaskBatch, Option<Vec<f32>>)> {
        let planes = self
            .masks
            .into_iter()
            .enumerate()
            .map(|(index, grid)| grid.into_plane(index))
            .collect::<Result<Vec<_>>>()?;
        let batch = MaskBatch::from_masks(planes)?;

        let scores = self.scores.filter(|scores| !scores.is_empty());
        if let Some(scores) = &scores {
            if scores.len() != batch.len() {
                return Err(OverlayError::ShapeMismatch(format!(
                    "{} scores supplied for {} masks",
                    scores.len(),
                    batch.len()
                )));
            }
        }

        Ok((batch, scores))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_masks_with_scores() {
        let json = r#"{
            "masks": [[[0.1, 0.9, 0.2], [0.3, 0.4, 0.8]], [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]],
            "boxes": [[1.0, 2.0, 3.0, 4.0], [5.0, 6.0, 7.0, 8.0]],
            "scores": [0.87, 0.55]
        }"#;
        let response = PredictionResponse::from_json_str(json).expect("Should parse payload");
        assert_eq!(response.boxes.len(), 2);

        let (batch, scores) = response.into_batch().expect("Should validate payload");
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.resolution(), Some((2, 3)));
        assert_eq!(batch.get(0).map(|m| m[[0, 1]]), Some(0.9));
        assert_eq!(scores, Some(vec![0.87, 0.55]));
    }

    #[test]
    fn test_singleton_channel_masks() {
        let json = r#"{"masks": [[[[0.1, 0.9], [0.3, 0.4]]]]}"#;
        let (batch, scores) = PredictionResponse::from_json_str(json)
            .and_then(PredictionResponse::into_batch)
            .expect("Should squeeze the channel level");
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.resolution(), Some((2, 2)));
        assert_eq!(scores, None);
    }

    #[test]
    fn test_multi_channel_mask_is_rejected() {
        let json = r#"{"masks": [[[[0.1]], [[0.2]]]]}"#;
        let result = PredictionResponse::from_json_str(json).and_then(PredictionResponse::into_batch);
        assert!(matches!(result, Err(OverlayError::ShapeMismatch(_))));
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let json = r#"{"masks": [[[0.1, 0.2], [0.3]]]}"#;
        let result = PredictionResponse::from_json_str(json).and_then(PredictionResponse::into_batch);
        assert!(matches!(result, Err(OverlayError::ShapeMismatch(_))));
    }

    #[test]
    fn test_masks_of_different_sizes_are_rejected() {
        let json = r#"{"masks": [[[0.1, 0.2], [0.3, 0.4]], [[0.1, 0.2, 0.3]]]}"#;
        let result = PredictionResponse::from_json_str(json).and_then(PredictionResponse::into_batch);
        assert!(matches!(result, Err(OverlayError::ShapeMismatch(_))));
    }

    #[test]
    fn test_score_count_must_match() {
        let json = r#"{"masks": [[[0.1]], [[0.2]]], "scores": [0.5]}"#;
        let result = PredictionResponse::from_json_str(json).and_then(PredictionResponse::into_batch);
        assert!(matches!(result, Err(OverlayError::ShapeMismatch(_))));
    }

    #[test]
    fn test_empty_scores_mean_no_labels() {
        let json = r#"{"masks": [[[0.1]]], "boxes": [], "scores": []}"#;
        let (batch, scores) = PredictionResponse::from_json_str(json)
            .and_then(PredictionResponse::into_batch)
            .expect("Should accept empty scores");
        assert_eq!(batch.len(), 1);
        assert_eq!(scores, None);
    }

    #[test]
    fn test_empty_masks() {
        let (batch, scores) = PredictionResponse::from_json_str(r#"{"masks": []}"#)
            .and_then(PredictionResponse::into_batch)
            .expect("Should accept no masks");
        assert!(batch.is_empty());
        assert_eq!(batch.resolution(), None);
        assert_eq!(scores, None);
    }

    #[test]
    fn test_masks_field_is_required() {
        let result = PredictionResponse::from_json_str(r#"{"scores": [0.4]}"#);
        assert!(matches!(result, Err(OverlayError::Serialization(_))));
    }

    #[test]
    fn test_from_reader() {
        let bytes = br#"{"masks": [[[1.0, 0.0]]]}"#;
        let response = PredictionResponse::from_reader(&bytes[..]).expect("Should parse from reader");
        assert_eq!(response.masks.len(), 1);
    }
}
