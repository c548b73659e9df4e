use std::sync::atomic::{AtomicU64, Ordering};

/// Counts bytes the kernel copies on top of the arithmetic itself: clones
/// made by allocating operations and temporaries copied back after an
/// aliased call.
#[derive(Debug, Default)]
pub struct CopyMetrics {
    copy_bytes: AtomicU64,
}

impl CopyMetrics {
    pub(crate) fn record_elements(&self, elements: usize) {
        let bytes = (elements * std::mem::size_of::<f64>()) as u64;
        self.copy_bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn copy_bytes_total(&self) -> u64 {
        self.copy_bytes.load(Ordering::Relaxed)
    }

    pub fn take_copy_bytes(&self) -> u64 {
        self.copy_bytes.swap(0, Ordering::Relaxed)
    }

    pub fn reset_copy_bytes(&self) {
        self.copy_bytes.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_resets_counter() {
        let metrics = CopyMetrics::default();
        metrics.record_elements(4);
        metrics.record_elements(2);
        assert_eq!(metrics.copy_bytes_total(), 48);
        assert_eq!(metrics.take_copy_bytes(), 48);
        assert_eq!(metrics.copy_bytes_total(), 0);
        metrics.record_elements(1);
        metrics.reset_copy_bytes();
        assert_eq!(metrics.copy_bytes_total(), 0);
    }
}
