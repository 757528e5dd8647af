#![no_main]

use arbitrary::Unstructured;

use arrsweeper::{sweep_with_config, Arrangement, LinearGeometry, LinearPoint, SweepConfig};
use libfuzzer_sys::fuzz_target;

// Lots of coincidences on a small grid: shared ends, overlaps, isolated
// points and unbounded curves.
fn sweep_grid(mut u: Unstructured) -> Result<(), arbitrary::Error> {
    let objects = arrsweeper::arbitrary::grid_objects(4, &mut u)?;
    let config = SweepConfig {
        merge_mergeable_curves: u.arbitrary()?,
    };
    let mut arr = Arrangement::<LinearPoint, _>::new();
    sweep_with_config(&LinearGeometry, objects, config, &mut arr).unwrap();
    let degrees: usize = arr.vertices().iter().map(|v| v.degree).sum();
    assert_eq!(degrees, 2 * arr.num_edges());
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let u = Unstructured::new(data);
    let _ = sweep_grid(u);
});
