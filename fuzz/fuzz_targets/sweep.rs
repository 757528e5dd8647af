#![no_main]

use arbitrary::Unstructured;

use arrsweeper::{sweep, Arrangement, LinearGeometry};
use libfuzzer_sys::fuzz_target;

// Segments with arbitrary coordinates. Crossings are exact no matter how the
// segments are placed, so every sweep has to succeed.
fn sweep_segments(mut u: Unstructured) -> Result<(), arbitrary::Error> {
    let segments = arrsweeper::arbitrary::segments(1e3, &mut u)?;
    let mut arr = Arrangement::new();
    sweep(&LinearGeometry, segments, &mut arr).unwrap();
    for rec in arr.edges() {
        assert!(rec.left < rec.right);
    }
    let degrees: usize = arr.vertices().iter().map(|v| v.degree).sum();
    assert_eq!(degrees, 2 * arr.num_edges());
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let u = Unstructured::new(data);
    let _ = sweep_segments(u);
});
