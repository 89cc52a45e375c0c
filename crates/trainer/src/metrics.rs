//! Classification metrics used by model selection and calibration.

/// Recall of one class: fraction of its true rows that were predicted as
/// that class. Returns 0 when the class is absent from the truth.
pub fn recall(truth: &[u8], predicted: &[u8], class: u8) -> f64 {
    let mut relevant = 0usize;
    let mut hit = 0usize;

    for (&t, &p) in truth.iter().zip(predicted) {
        if t == class {
            relevant += 1;
            if p == class {
                hit += 1;
            }
        }
    }

    if relevant == 0 {
        0.0
    } else {
        hit as f64 / relevant as f64
    }
}
