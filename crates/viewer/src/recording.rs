use std::collections::BTreeSet;

use foundation::Opacity;

use crate::backend::{BackendError, LayerSlot, MapBackend, SourceDescriptor};

/// One operation issued to the backend, in issue order.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendOp {
    Attach {
        id: String,
        tileset: String,
        tile_size: u32,
        slot: LayerSlot,
    },
    SetOpacity {
        id: String,
        opacity: f64,
    },
    Detach {
        id: String,
    },
}

impl BackendOp {
    pub fn id(&self) -> &str {
        match self {
            BackendOp::Attach { id, .. }
            | BackendOp::SetOpacity { id, .. }
            | BackendOp::Detach { id } => id,
        }
    }
}

/// Strict in-memory backend double.
///
/// Strict: like the real mapping SDK it rejects a duplicate attach, and an
/// opacity write or detach for a layer it does not hold. Controller guards
/// are therefore load-bearing in tests, not decorative.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    ops: Vec<BackendOp>,
    attached: BTreeSet<String>,
    fail_attach: bool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that refuses every attach, for failure-path tests.
    pub fn refusing_attach() -> Self {
        Self {
            fail_attach: true,
            ..Self::default()
        }
    }

    pub fn ops(&self) -> &[BackendOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<BackendOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn has_layer(&self, id: &str) -> bool {
        self.attached.contains(id)
    }

    /// Currently attached layer ids, in sorted order.
    pub fn attached_ids(&self) -> Vec<String> {
        self.attached.iter().cloned().collect()
    }
}

impl MapBackend for RecordingBackend {
    fn attach_layer(
        &mut self,
        id: &str,
        source: &SourceDescriptor,
        slot: LayerSlot,
    ) -> Result<(), BackendError> {
        if self.fail_attach {
            return Err(BackendError::Rejected(format!("attach {id} refused")));
        }
        if !self.attached.insert(id.to_string()) {
            return Err(BackendError::Rejected(format!("duplicate layer {id}")));
        }
        self.ops.push(BackendOp::Attach {
            id: id.to_string(),
            tileset: source.tileset.as_str().to_string(),
            tile_size: source.tile_size,
            slot,
        });
        Ok(())
    }

    fn set_opacity(&mut self, id: &str, opacity: Opacity) -> Result<(), BackendError> {
        if !self.attached.contains(id) {
            return Err(BackendError::Rejected(format!("unknown layer {id}")));
        }
        self.ops.push(BackendOp::SetOpacity {
            id: id.to_string(),
            opacity: opacity.value(),
        });
        Ok(())
    }

    fn detach_layer(&mut self, id: &str) -> Result<(), BackendError> {
        if !self.attached.remove(id) {
            return Err(BackendError::Rejected(format!("unknown layer {id}")));
        }
        self.ops.push(BackendOp::Detach { id: id.to_string() });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{BackendOp, RecordingBackend};
    use crate::backend::{LayerSlot, MapBackend, SourceDescriptor};
    use foundation::Opacity;
    use layers::Tileset;

    fn descriptor() -> SourceDescriptor {
        SourceDescriptor {
            tileset: Tileset("mapbox://example.t".to_string()),
            tile_size: 128,
            fade_ms: 1000,
        }
    }

    #[test]
    fn rejects_duplicate_attach() {
        let mut b = RecordingBackend::new();
        b.attach_layer("a", &descriptor(), LayerSlot::NoiseOverlay)
            .expect("first attach");
        assert!(
            b.attach_layer("a", &descriptor(), LayerSlot::NoiseOverlay)
                .is_err()
        );
    }

    #[test]
    fn rejects_operations_on_unknown_layers() {
        let mut b = RecordingBackend::new();
        assert!(b.set_opacity("a", Opacity::HIDDEN).is_err());
        assert!(b.detach_layer("a").is_err());
    }

    #[test]
    fn records_ops_in_issue_order() {
        let mut b = RecordingBackend::new();
        b.attach_layer("a", &descriptor(), LayerSlot::NoiseOverlay)
            .expect("attach");
        b.set_opacity("a", Opacity::new(0.8)).expect("show");
        b.detach_layer("a").expect("detach");

        let ids: Vec<&str> = b.ops().iter().map(BackendOp::id).collect();
        assert_eq!(ids, vec!["a", "a", "a"]);
        assert!(matches!(b.ops()[2], BackendOp::Detach { .. }));
        assert!(!b.has_layer("a"));
    }
}
