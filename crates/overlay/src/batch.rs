use ndarray::{Array2, Array3, ArrayD, ArrayView2, Axis, Ix3};

use crate::error::{OverlayError, Result};

/// An ordered batch of probability masks sharing one (height, width).
///
/// Stored as an `N x H x W` array. Inputs carrying a redundant singleton
/// channel axis (`N x 1 x H x W`) are squeezed once, at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskBatch {
    masks: Array3<f32>,
}

impl MaskBatch {
    pub fn new(masks: Array3<f32>) -> Self {
        Self { masks }
    }

    /// A batch with no masks and no resolution of its own
    pub fn empty() -> Self {
        Self::new(Array3::zeros((0, 0, 0)))
    }

    /// A batch with no masks that still defines the output resolution
    pub fn empty_with_size(height: usize, width: usize) -> Self {
        Self::new(Array3::zeros((0, height, width)))
    }

    /// Build from an array of rank 3 (`N x H x W`) or rank 4 (`N x 1 x H x W`)
    pub fn from_dyn(array: ArrayD<f32>) -> Result<Self> {
        match array.ndim() {
            3 => {
                let masks = array
                    .into_dimensionality::<Ix3>()
                    .map_err(|e| OverlayError::ShapeMismatch(e.to_string()))?;
                Ok(Self::new(masks))
            }
            4 => {
                let channels = array.shape()[1];
                if channels != 1 {
                    return Err(OverlayError::ShapeMismatch(format!(
                        "expected a singleton channel axis, got shape {:?}",
                        array.shape()
                    )));
                }
                let masks = array
                    .index_axis_move(Axis(1), 0)
                    .into_dimensionality::<Ix3>()
                    .map_err(|e| OverlayError::ShapeMismatch(e.to_string()))?;
                Ok(Self::new(masks))
            }
            rank => Err(OverlayError::ShapeMismatch(format!(
                "masks must have rank 3 or 4, got rank {rank} with shape {:?}",
                array.shape()
            ))),
        }
    }

    /// Stack individual 2D masks; all of them must share one shape
    pub fn from_masks(masks: Vec<Array2<f32>>) -> Result<Self> {
        let Some(first) = masks.first() else {
            return Ok(Self::empty());
        };
        let (height, width) = first.dim();

        for (index, mask) in masks.iter().enumerate() {
            if mask.dim() != (height, width) {
                return Err(OverlayError::ShapeMismatch(format!(
                    "mask {index} has shape {:?}, expected {:?}",
                    mask.dim(),
                    (height, width)
                )));
            }
        }

        let views: Vec<ArrayView2<f32>> = masks.iter().map(|mask| mask.view()).collect();
        let stacked = ndarray::stack(Axis(0), &views)
            .map_err(|e| OverlayError::ShapeMismatch(e.to_string()))?;
        Ok(Self::new(stacked))
    }

    pub fn len(&self) -> usize {
        self.masks.len_of(Axis(0))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn height(&self) -> usize {
        self.masks.len_of(Axis(1))
    }

    pub fn width(&self) -> usize {
        self.masks.len_of(Axis(2))
    }

    /// `(height, width)` if the batch defines a non-degenerate resolution
    pub fn resolution(&self) -> Option<(u32, u32)> {
        let height = u32::try_from(self.height()).ok()?;
        let width = u32::try_from(self.width()).ok()?;
        (height > 0 && width > 0).then_some((height, width))
    }

    pub fn get(&self, index: usize) -> Option<ArrayView2<'_, f32>> {
        (index < self.len()).then(|| self.masks.index_axis(Axis(0), index))
    }

    /// Masks in render order
    pub fn iter(&self) -> impl Iterator<Item = ArrayView2<'_, f32>> {
        self.masks.outer_iter()
    }

    pub fn as_array(&self) -> &Array3<f32> {
        &self.masks
    }
}

impl From<Array3<f32>> for MaskBatch {
    fn from(masks: Array3<f32>) -> Self {
        Self::new(masks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array4, IxDyn};

    #[test]
    fn test_rank4_singleton_channel_is_squeezed() {
        let array = Array4::<f32>::from_elem((2, 1, 3, 5), 0.7).into_dyn();
        let batch = MaskBatch::from_dyn(array).expect("Should squeeze singleton channel");
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.height(), 3);
        assert_eq!(batch.width(), 5);
        assert_eq!(batch.resolution(), Some((3, 5)));
    }

    #[test]
    fn test_rank4_with_real_channels_is_rejected() {
        let array = Array4::<f32>::zeros((2, 3, 4, 4)).into_dyn();
        assert!(matches!(MaskBatch::from_dyn(array), Err(OverlayError::ShapeMismatch(_))));
    }

    #[test]
    fn test_other_ranks_are_rejected() {
        for shape in [vec![4, 4], vec![1, 1, 1, 4, 4], vec![8]] {
            let array = ArrayD::<f32>::zeros(IxDyn(&shape));
            assert!(
                matches!(MaskBatch::from_dyn(array), Err(OverlayError::ShapeMismatch(_))),
                "shape {shape:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_mismatched_masks_are_rejected() {
        let masks = vec![Array2::<f32>::zeros((4, 4)), Array2::<f32>::zeros((5, 5))];
        assert!(matches!(MaskBatch::from_masks(masks), Err(OverlayError::ShapeMismatch(_))));
    }

    #[test]
    fn test_from_masks_preserves_order() {
        let masks = vec![Array2::from_elem((2, 3), 0.1), Array2::from_elem((2, 3), 0.9)];
        let batch = MaskBatch::from_masks(masks).expect("Should stack masks");
        let firsts: Vec<f32> = batch.iter().map(|mask| mask[[0, 0]]).collect();
        assert_eq!(firsts, vec![0.1, 0.9]);
        assert_eq!(batch.get(1).map(|mask| mask[[1, 2]]), Some(0.9));
        assert!(batch.get(2).is_none());
    }

    #[test]
    fn test_empty_batches() {
        let batch = MaskBatch::empty();
        assert!(batch.is_empty());
        assert_eq!(batch.resolution(), None);

        let batch = MaskBatch::empty_with_size(6, 8);
        assert!(batch.is_empty());
        assert_eq!(batch.resolution(), Some((6, 8)));

        let batch = MaskBatch::from_masks(Vec::new()).expect("Empty input is allowed");
        assert!(batch.is_empty());
    }
}
