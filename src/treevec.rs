//! A positional B-tree: a sequence with logarithmic insertion and removal at
//! arbitrary positions.
//!
//! This backs both the event queue and the status line. Neither of those
//! needs key lookup: they keep their elements sorted by a comparator that
//! depends on the geometry (and, for the status line, on the current sweep
//! position), so all searching goes through [`TreeVec::partition_point`].

use arrayvec::ArrayVec;

/// A sequence stored in a B-tree with fan-out `B`.
///
/// `B` must be even and at least 4.
#[derive(Clone, Debug)]
pub struct TreeVec<T, const B: usize> {
    root: Node<T, B>,
}

#[derive(Clone, Debug)]
enum Node<T, const B: usize> {
    Leaf(ArrayVec<T, B>),
    Internal {
        // The number of elements stored under each child.
        sizes: ArrayVec<usize, B>,
        children: ArrayVec<Box<Node<T, B>>, B>,
    },
}

// Finds the child holding position `offset`. If `for_insert` is true, a
// position on the boundary between two children goes to the earlier one.
fn child_at(sizes: &[usize], mut offset: usize, for_insert: bool) -> (usize, usize) {
    for (idx, &size) in sizes.iter().enumerate() {
        if offset < size || (for_insert && offset == size) {
            return (idx, offset);
        }
        offset -= size;
    }
    panic!("position out of bounds");
}

// Moves elements between two siblings so that they end up (almost) equally
// full. Returns true if everything fit into `left` and `right` is now empty.
fn merge_or_balance<T, const B: usize>(
    left: &mut ArrayVec<T, B>,
    right: &mut ArrayVec<T, B>,
) -> bool {
    let total = left.len() + right.len();
    if total <= B {
        left.extend(right.drain(..));
        return true;
    }

    let target = total / 2;
    if left.len() < target {
        let count = target - left.len();
        left.extend(right.drain(..count));
    } else {
        let mut moved: ArrayVec<T, B> = left.drain(target..).collect();
        moved.extend(right.drain(..));
        *right = moved;
    }
    false
}

impl<T, const B: usize> Node<T, B> {
    fn len(&self) -> usize {
        match self {
            Node::Leaf(data) => data.len(),
            Node::Internal { sizes, .. } => sizes.iter().sum(),
        }
    }

    fn fan_out(&self) -> usize {
        match self {
            Node::Leaf(data) => data.len(),
            Node::Internal { children, .. } => children.len(),
        }
    }

    fn last(&self) -> Option<&T> {
        match self {
            Node::Leaf(data) => data.last(),
            Node::Internal { children, .. } => children.last()?.last(),
        }
    }

    fn get(&self, offset: usize) -> Option<&T> {
        match self {
            Node::Leaf(data) => data.get(offset),
            Node::Internal { sizes, children } => {
                if offset >= sizes.iter().sum::<usize>() {
                    return None;
                }
                let (idx, offset) = child_at(sizes, offset, false);
                children[idx].get(offset)
            }
        }
    }

    // Inserts, returning the new right sibling if this node had to split.
    fn insert(&mut self, offset: usize, element: T) -> Option<Box<Node<T, B>>> {
        match self {
            Node::Leaf(data) => {
                if !data.is_full() {
                    data.insert(offset, element);
                    return None;
                }
                let mut right: ArrayVec<T, B> = data.drain(B / 2..).collect();
                if offset <= B / 2 {
                    data.insert(offset, element);
                } else {
                    right.insert(offset - B / 2, element);
                }
                Some(Box::new(Node::Leaf(right)))
            }
            Node::Internal { sizes, children } => {
                let (idx, child_offset) = child_at(sizes, offset, true);
                sizes[idx] += 1;
                let new_child = children[idx].insert(child_offset, element)?;
                sizes[idx] = children[idx].len();
                let new_size = new_child.len();

                if !children.is_full() {
                    children.insert(idx + 1, new_child);
                    sizes.insert(idx + 1, new_size);
                    return None;
                }

                let mut right_children: ArrayVec<_, B> = children.drain(B / 2..).collect();
                let mut right_sizes: ArrayVec<_, B> = sizes.drain(B / 2..).collect();
                if idx < B / 2 {
                    children.insert(idx + 1, new_child);
                    sizes.insert(idx + 1, new_size);
                } else {
                    right_children.insert(idx + 1 - B / 2, new_child);
                    right_sizes.insert(idx + 1 - B / 2, new_size);
                }
                Some(Box::new(Node::Internal {
                    sizes: right_sizes,
                    children: right_children,
                }))
            }
        }
    }

    // Removes and returns an element. The caller is responsible for fixing
    // up this node if it becomes underfull.
    fn remove(&mut self, offset: usize) -> T {
        match self {
            Node::Leaf(data) => data.remove(offset),
            Node::Internal { sizes, children } => {
                let (idx, child_offset) = child_at(sizes, offset, false);
                let ret = children[idx].remove(child_offset);
                sizes[idx] -= 1;
                if children[idx].fan_out() < B / 2 && children.len() > 1 {
                    let left = if idx + 1 < children.len() { idx } else { idx - 1 };
                    Self::fix_underfull(sizes, children, left);
                }
                ret
            }
        }
    }

    // Merges or rebalances the siblings at `left` and `left + 1`.
    fn fix_underfull(
        sizes: &mut ArrayVec<usize, B>,
        children: &mut ArrayVec<Box<Node<T, B>>, B>,
        left: usize,
    ) {
        let (head, tail) = children.split_at_mut(left + 1);
        let merged = match (&mut *head[left], &mut *tail[0]) {
            (Node::Leaf(a), Node::Leaf(b)) => merge_or_balance(a, b),
            (
                Node::Internal {
                    sizes: sa,
                    children: ca,
                },
                Node::Internal {
                    sizes: sb,
                    children: cb,
                },
            ) => {
                let merged = merge_or_balance(sa, sb);
                merge_or_balance(ca, cb);
                merged
            }
            _ => unreachable!("siblings have the same height"),
        };

        if merged {
            children.remove(left + 1);
            sizes.remove(left + 1);
            sizes[left] = children[left].len();
        } else {
            sizes[left] = children[left].len();
            sizes[left + 1] = children[left + 1].len();
        }
    }

    fn check_invariants(&self, is_root: bool) -> usize {
        match self {
            Node::Leaf(data) => {
                assert!(is_root || data.len() >= B / 2);
                1
            }
            Node::Internal { sizes, children } => {
                assert_eq!(sizes.len(), children.len());
                assert!(if is_root {
                    children.len() >= 2
                } else {
                    children.len() >= B / 2
                });

                let mut height = None;
                for (child, &size) in children.iter().zip(sizes) {
                    assert_eq!(child.len(), size);
                    let h = child.check_invariants(false);
                    assert_eq!(*height.get_or_insert(h), h);
                }
                height.unwrap_or(0) + 1
            }
        }
    }
}

impl<T, const B: usize> Default for TreeVec<T, B> {
    fn default() -> Self {
        Self {
            root: Node::Leaf(ArrayVec::new()),
        }
    }
}

impl<T, const B: usize> TreeVec<T, B> {
    /// Creates an empty sequence.
    pub fn new() -> Self {
        const { assert!(B >= 4 && B % 2 == 0) };
        Self::default()
    }

    /// Are we empty?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of elements.
    pub fn len(&self) -> usize {
        self.root.len()
    }

    /// The element at `index`, if there is one.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.root.get(index)
    }

    /// Inserts `element` so that it ends up at position `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > self.len()`.
    pub fn insert(&mut self, index: usize, element: T) {
        assert!(index <= self.len(), "insertion index out of bounds");
        if let Some(sibling) = self.root.insert(index, element) {
            let old_root = std::mem::replace(&mut self.root, Node::Leaf(ArrayVec::new()));
            let mut sizes = ArrayVec::new();
            let mut children = ArrayVec::new();
            sizes.push(old_root.len());
            sizes.push(sibling.len());
            children.push(Box::new(old_root));
            children.push(sibling);
            self.root = Node::Internal { sizes, children };
        }
    }

    /// Removes and returns the element at position `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn remove(&mut self, index: usize) -> T {
        assert!(index < self.len(), "removal index out of bounds");
        let ret = self.root.remove(index);

        let single_child = matches!(&self.root, Node::Internal { children, .. } if children.len() == 1);
        if single_child {
            let old_root = std::mem::replace(&mut self.root, Node::Leaf(ArrayVec::new()));
            if let Node::Internal { mut children, .. } = old_root {
                if let Some(child) = children.pop() {
                    self.root = *child;
                }
            }
        }
        ret
    }

    /// Checks the structural invariants of the tree, panicking if any fail.
    pub fn check_invariants(&self) {
        self.root.check_invariants(true);
    }

    /// Iterates over the elements in order.
    pub fn iter(&self) -> Iter<'_, T, B> {
        let mut ret = Iter {
            stack: Vec::new(),
            leaf: [].iter(),
        };
        ret.descend(&self.root);
        ret
    }

    /// Returns the index of the first element for which `pred` is false,
    /// assuming that `pred` is true on some prefix and false afterwards.
    ///
    /// The search follows the tree: at each internal node it binary-searches
    /// the children by their last element, so it runs in time
    /// `O(log(B) * depth^2)`.
    pub fn partition_point<P>(&self, mut pred: P) -> usize
    where
        P: FnMut(&T) -> bool,
    {
        let mut node = &self.root;
        let mut base = 0;
        loop {
            match node {
                Node::Leaf(data) => return base + data.partition_point(|x| pred(x)),
                Node::Internal { sizes, children } => {
                    let idx = children.partition_point(|c| c.last().is_some_and(|x| pred(x)));
                    base += sizes[..idx].iter().sum::<usize>();
                    match children.get(idx) {
                        Some(child) => node = &**child,
                        None => return base,
                    }
                }
            }
        }
    }
}

impl<T, const B: usize> std::ops::Index<usize> for TreeVec<T, B> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(elt) => elt,
            None => panic!("index {index} out of bounds (len {})", self.len()),
        }
    }
}

impl<T, const B: usize> FromIterator<T> for TreeVec<T, B> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut ret = TreeVec::new();
        for elt in iter {
            ret.insert(ret.len(), elt);
        }
        ret
    }
}

/// An in-order iterator over a [`TreeVec`].
pub struct Iter<'a, T, const B: usize> {
    // Pending siblings, one iterator per level above the current leaf.
    stack: Vec<std::slice::Iter<'a, Box<Node<T, B>>>>,
    leaf: std::slice::Iter<'a, T>,
}

impl<'a, T, const B: usize> Iter<'a, T, B> {
    fn descend(&mut self, mut node: &'a Node<T, B>) {
        loop {
            match node {
                Node::Leaf(data) => {
                    self.leaf = data.iter();
                    return;
                }
                Node::Internal { children, .. } => {
                    let mut iter = children.iter();
                    match iter.next() {
                        Some(first) => {
                            self.stack.push(iter);
                            node = &**first;
                        }
                        None => return,
                    }
                }
            }
        }
    }
}

impl<'a, T, const B: usize> Iterator for Iter<'a, T, B> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            if let Some(x) = self.leaf.next() {
                return Some(x);
            }
            let next_child = loop {
                let top = self.stack.last_mut()?;
                match top.next() {
                    Some(child) => break child,
                    None => {
                        self.stack.pop();
                    }
                }
            };
            self.descend(next_child);
        }
    }
}
