#![no_main]

use arbitrary::{Arbitrary, Unstructured};

use arrsweeper::treevec::TreeVec;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Op {
    Insert { idx: usize, val: i32 },
    Remove { idx: usize },
    InsertSorted { val: i32 },
}

// Applies the same operation to a `Vec` and a `TreeVec`, checking that they
// agree on anything the operation returns.
fn apply<const B: usize>(op: &Op, vec: &mut Vec<i32>, tree: &mut TreeVec<i32, B>) {
    match op {
        Op::Insert { idx, val } => {
            let idx = *idx % (vec.len() + 1);
            vec.insert(idx, *val);
            tree.insert(idx, *val);
        }
        Op::Remove { idx } => {
            if !vec.is_empty() {
                let idx = *idx % vec.len();
                assert_eq!(vec.remove(idx), tree.remove(idx));
            }
        }
        Op::InsertSorted { val } => {
            // Only meaningful if the contents are sorted, which they are if
            // this is the only kind of insertion.
            let idx = vec.partition_point(|x| x < val);
            if vec.is_sorted() {
                assert_eq!(tree.partition_point(|x| x < val), idx);
            }
            vec.insert(idx, *val);
            tree.insert(idx, *val);
        }
    }
}

fn arbitrary_ops(mut u: Unstructured) -> Result<(), arbitrary::Error> {
    let len = u.arbitrary_len::<Op>()?;
    let mut vec = Vec::new();
    let mut narrow = TreeVec::<_, 4>::new();
    let mut wide = TreeVec::<_, 8>::new();
    for _ in 0..len {
        let op: Op = u.arbitrary()?;
        let mut vec2 = vec.clone();
        apply(&op, &mut vec, &mut narrow);
        apply(&op, &mut vec2, &mut wide);
        narrow.check_invariants();
        wide.check_invariants();

        assert_eq!(narrow.len(), vec.len());
        assert_eq!(narrow.iter().cloned().collect::<Vec<_>>(), vec);
        assert_eq!(wide.iter().cloned().collect::<Vec<_>>(), vec);
    }
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let u = Unstructured::new(data);
    let _ = arbitrary_ops(u);
});
