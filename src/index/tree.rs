//! Unbalanced binary search tree over rank keys.
//!
//! Insertion walks from the root, so building from keys in sorted order
//! degrades to a list of depth N. Every walk is iterative to keep degenerate
//! trees off the call stack.

use std::cmp::Ordering;

use super::{RankIndex, RankKey};
use crate::core::SiteId;

type Link = Option<Box<Node>>;

#[derive(Debug)]
struct Node {
    key: RankKey,
    site: SiteId,
    left: Link,
    right: Link,
}

impl Node {
    fn new(key: RankKey, site: SiteId) -> Self {
        Self {
            key,
            site,
            left: None,
            right: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct RatioTree {
    root: Link,
    len: usize,
}

impl RatioTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(&Node, usize)> = self.root.iter().map(|n| (&**n, 1)).collect();

        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            for child in [&node.left, &node.right].into_iter().flatten() {
                stack.push((&**child, depth + 1));
            }
        }

        deepest
    }

    pub fn iter(&self) -> InOrder<'_> {
        let mut iter = InOrder { stack: Vec::new() };
        iter.push_left(&self.root);
        iter
    }
}

impl Drop for RatioTree {
    fn drop(&mut self) {
        let mut stack: Vec<Box<Node>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

/// Unlinks the minimum node of a non-empty subtree.
fn detach_min(link: &mut Link) -> Link {
    let mut cur = link;
    while cur.as_ref()?.left.is_some() {
        cur = &mut cur.as_mut()?.left;
    }

    let mut min = cur.take()?;
    *cur = min.right.take();
    Some(min)
}

impl RankIndex for RatioTree {
    fn insert(&mut self, key: RankKey, site: SiteId) {
        let mut cur = &mut self.root;
        while let Some(node) = cur {
            cur = match key.cmp(&node.key) {
                Ordering::Less => &mut node.left,
                Ordering::Greater => &mut node.right,
                Ordering::Equal => {
                    node.site = site;
                    return;
                }
            };
        }

        *cur = Some(Box::new(Node::new(key, site)));
        self.len += 1;
    }

    fn remove(&mut self, key: &RankKey) -> Option<SiteId> {
        let mut cur = &mut self.root;
        loop {
            let ord = key.cmp(&cur.as_ref()?.key);
            cur = match ord {
                Ordering::Less => &mut cur.as_mut()?.left,
                Ordering::Greater => &mut cur.as_mut()?.right,
                Ordering::Equal => break,
            };
        }

        let mut node = cur.take()?;
        *cur = match (node.left.take(), node.right.take()) {
            (None, None) => None,
            (Some(child), None) | (None, Some(child)) => Some(child),
            (Some(left), Some(right)) => {
                let mut right = Some(right);
                let mut successor = detach_min(&mut right)?;
                successor.left = Some(left);
                successor.right = right;
                Some(successor)
            }
        };

        self.len -= 1;
        Some(node.site)
    }

    fn ascending(&self) -> Vec<SiteId> {
        self.iter().map(|(_, site)| site).collect()
    }

    fn len(&self) -> usize {
        self.len
    }
}

/// In-order traversal yielding `(key, site)` pairs in ascending key order.
pub struct InOrder<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> InOrder<'a> {
    fn push_left(&mut self, mut link: &'a Link) {
        while let Some(node) = link {
            self.stack.push(node);
            link = &node.left;
        }
    }
}

impl<'a> Iterator for InOrder<'a> {
    type Item = (RankKey, SiteId);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(&node.right);
        Some((node.key, node.site))
    }
}
