// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Completion trie: sequence-prefix lookup over token-id tuples, ranked by
//! score.
//!
//! Every stored completion is a path from the root; children of a node are
//! kept sorted by token id so that a contiguous range of children can be
//! found with one binary search. Token ids inside the trie are **1-based**
//! (id 0 is reserved as the terminal marker for completions that end at a
//! given node) — the `+1` shift lives entirely at this module's boundary,
//! per the crate-wide id-0 convention.
//!
//! The trie does not store document ids directly. Instead, each node's
//! subtree maps to a contiguous range of positions in a **leaf-order
//! permutation** (`leaf_doc_ids`): a depth-first, ascending-token-id walk of
//! the trie visits completions in an order generally different from
//! doc-id/score order, which is exactly why [`crate::docs_list::UnsortedDocsList`]
//! needs an RMQ rather than a plain sorted scan to pull out the top-k doc
//! ids within a subtree.

use crate::docs_list::UnsortedDocsList;
use crate::error::Result;
use crate::format::{write_u32_vec, Reader};

/// Flattened arena of trie nodes. Node `0` is the (virtual) root; every
/// other node's `token` field holds its 1-based token id. Children of node
/// `i` occupy `first_child[i] .. first_child[i] + num_children[i]` in this
/// same arena, sorted ascending by `token`.
#[derive(Debug, Clone)]
pub struct CompletionTrie {
    token: Vec<u32>,
    first_child: Vec<u32>,
    num_children: Vec<u32>,
    /// `[left[i], right[i])`: the range of positions in the leaf-order
    /// permutation covered by node `i`'s subtree (including a terminal
    /// completion ending exactly at `i`, if any).
    left: Vec<u32>,
    right: Vec<u32>,
    docs_list: UnsortedDocsList,
}

const ROOT: usize = 0;
const TERMINATOR: u32 = 0;

struct BuildNode {
    token: u32,
    children: Vec<BuildNode>,
    /// Doc id of a completion that ends exactly at this node, if any (there
    /// may be more than one if the input contains exact duplicate
    /// completions; we keep all of them as extra terminator children).
    terminal_doc_ids: Vec<u32>,
}

impl BuildNode {
    fn new(token: u32) -> Self {
        BuildNode {
            token,
            children: Vec::new(),
            terminal_doc_ids: Vec::new(),
        }
    }

    fn child_mut(&mut self, token: u32) -> &mut BuildNode {
        if let Some(pos) = self.children.iter().position(|c| c.token == token) {
            &mut self.children[pos]
        } else {
            self.children.push(BuildNode::new(token));
            self.children.last_mut().unwrap()
        }
    }
}

impl CompletionTrie {
    /// Builds a trie from `completions`: each entry is a sequence of
    /// **0-based** dictionary token ids for one completion, in ascending
    /// doc-id (i.e. descending score) order — `completions[doc_id]` is the
    /// token sequence for that doc.
    pub fn build(completions: &[Vec<u32>]) -> Self {
        let mut root = BuildNode::new(TERMINATOR);
        for (doc_id, ids) in completions.iter().enumerate() {
            let mut node = &mut root;
            for &id in ids {
                node = node.child_mut(id + 1);
            }
            node.terminal_doc_ids.push(doc_id as u32);
        }

        let mut token = Vec::new();
        let mut first_child = Vec::new();
        let mut num_children = Vec::new();
        let mut left = Vec::new();
        let mut right = Vec::new();
        let mut leaf_doc_ids = Vec::new();

        // Reserve node 0 for the root.
        token.push(TERMINATOR);
        first_child.push(0);
        num_children.push(0);
        left.push(0);
        right.push(0);

        let (root_first_child, root_num_children, root_left, root_right) = flatten_children(
            &mut root.children,
            &mut root.terminal_doc_ids,
            &mut token,
            &mut first_child,
            &mut num_children,
            &mut left,
            &mut right,
            &mut leaf_doc_ids,
        );
        first_child[ROOT] = root_first_child;
        num_children[ROOT] = root_num_children;
        left[ROOT] = root_left;
        right[ROOT] = root_right;

        CompletionTrie {
            token,
            first_child,
            num_children,
            left,
            right,
            docs_list: UnsortedDocsList::build(leaf_doc_ids, completions.len() as u32),
        }
    }

    pub fn num_docs(&self) -> usize {
        self.docs_list.len()
    }

    fn find_child(&self, node: usize, trie_token: u32) -> Option<usize> {
        let start = self.first_child[node] as usize;
        let count = self.num_children[node] as usize;
        let slice = &self.token[start..start + count];
        slice
            .binary_search(&trie_token)
            .ok()
            .map(|local| start + local)
    }

    /// Walks `prefix_ids` (0-based dictionary ids, already resolved complete
    /// tokens) then selects the contiguous children range whose token id
    /// lies in `suffix_range` (a 0-based dictionary id half-open range,
    /// shifted by the module's `+1` trie convention). Returns the leaf-order
    /// position range `[l, r)`, or `(0, 0)` if nothing matches.
    pub fn locate_prefix(&self, prefix_ids: &[u32], suffix_range: (u32, u32)) -> (u32, u32) {
        let mut node = ROOT;
        for &id in prefix_ids {
            match self.find_child(node, id + 1) {
                Some(child) => node = child,
                None => return (0, 0),
            }
        }
        if suffix_range.0 >= suffix_range.1 {
            return (0, 0);
        }
        let lo_key = suffix_range.0 + 1;
        let hi_key = suffix_range.1 + 1;
        let start = self.first_child[node] as usize;
        let count = self.num_children[node] as usize;
        let children = &self.token[start..start + count];
        let first = children.partition_point(|&t| t < lo_key);
        let last = children.partition_point(|&t| t < hi_key);
        if first >= last {
            return (0, 0);
        }
        let first_node = start + first;
        let last_node = start + last - 1;
        (self.left[first_node], self.right[last_node])
    }

    /// Top-k doc ids (ascending, i.e. highest score first) within a
    /// leaf-position range returned by `locate_prefix`.
    pub fn topk(&self, range: (u32, u32), k: u32, out: &mut Vec<u32>) -> u32 {
        if range.0 >= range.1 {
            return 0;
        }
        self.docs_list
            .topk((range.0 as usize, range.1 as usize), k, false, out)
    }

    pub fn size_in_bytes(&self) -> usize {
        self.token.len() * 4
            + self.first_child.len() * 4
            + self.num_children.len() * 4
            + self.left.len() * 4
            + self.right.len() * 4
            + self.docs_list.size_in_bytes()
            + 24
    }

    pub(crate) fn serialize(&self, buf: &mut Vec<u8>) {
        write_u32_vec(buf, &self.token);
        write_u32_vec(buf, &self.first_child);
        write_u32_vec(buf, &self.num_children);
        write_u32_vec(buf, &self.left);
        write_u32_vec(buf, &self.right);
        self.docs_list.serialize(buf);
    }

    pub(crate) fn deserialize(r: &mut Reader) -> Result<Self> {
        let token = r.read_u32_vec()?;
        let first_child = r.read_u32_vec()?;
        let num_children = r.read_u32_vec()?;
        let left = r.read_u32_vec()?;
        let right = r.read_u32_vec()?;
        let docs_list = UnsortedDocsList::deserialize(r)?;
        Ok(CompletionTrie {
            token,
            first_child,
            num_children,
            left,
            right,
            docs_list,
        })
    }
}

/// Recursively flattens `children` (and any doc ids terminating exactly at
/// their parent) into the arena, in ascending token-id order (terminator
/// children, token id 0, always sort first). Returns the parent's own
/// `(first_child, num_children, left, right)`.
#[allow(clippy::too_many_arguments)]
fn flatten_children(
    children: &mut [BuildNode],
    parent_terminal_doc_ids: &mut Vec<u32>,
    token: &mut Vec<u32>,
    first_child: &mut Vec<u32>,
    num_children: &mut Vec<u32>,
    left: &mut Vec<u32>,
    right: &mut Vec<u32>,
    leaf_doc_ids: &mut Vec<u32>,
) -> (u32, u32, u32, u32) {
    children.sort_by_key(|c| c.token);

    let parent_left = leaf_doc_ids.len() as u32;
    let mut parent_right = parent_left;

    // Terminal completions ending exactly at the parent are recorded as
    // leaves directly (conceptually "children" with token id 0, sorted
    // first); we fold them into the parent's own extent rather than
    // allocating real terminator nodes, since they carry no further subtree.
    for &doc_id in parent_terminal_doc_ids.iter() {
        leaf_doc_ids.push(doc_id);
        parent_right += 1;
    }

    let first = token.len() as u32;
    // Pre-reserve node slots so child recursion's indices are stable.
    for child in children.iter() {
        token.push(child.token);
        first_child.push(0);
        num_children.push(0);
        left.push(0);
        right.push(0);
    }

    for (i, child) in children.iter_mut().enumerate() {
        let idx = first as usize + i;
        let mut terminal = std::mem::take(&mut child.terminal_doc_ids);
        let (fc, nc, l, r) = flatten_children(
            &mut child.children,
            &mut terminal,
            token,
            first_child,
            num_children,
            left,
            right,
            leaf_doc_ids,
        );
        first_child[idx] = fc;
        num_children[idx] = nc;
        left[idx] = l;
        right[idx] = r;
        parent_right = r.max(parent_right);
    }

    (first, children.len() as u32, parent_left, parent_right)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<Vec<u32>> {
        // token ids: devils=0 jersey=1 new=2 pizza=3 times=4 university=5 york=6
        vec![
            vec![2, 6, 3], // new york pizza   doc 0
            vec![2, 6, 4], // new york times   doc 1
            vec![2, 1, 0], // new jersey devils doc 2
            vec![6, 5],    // york university  doc 3
        ]
    }

    #[test]
    fn locate_prefix_exact_path() {
        let trie = CompletionTrie::build(&corpus());
        // "new y" -> prefix=[new=2], suffix_range = [york=6, york+1=7)
        let range = trie.locate_prefix(&[2], (6, 7));
        let mut out = Vec::new();
        trie.topk(range, 3, &mut out);
        assert_eq!(out, vec![0, 1]);
    }

    #[test]
    fn locate_prefix_single_token_root() {
        let trie = CompletionTrie::build(&corpus());
        // "new" -> prefix=[], suffix_range=[new=2,new+1=3)
        let range = trie.locate_prefix(&[], (2, 3));
        let mut out = Vec::new();
        trie.topk(range, 2, &mut out);
        assert_eq!(out, vec![0, 1]);
    }

    #[test]
    fn locate_prefix_trailing_space_covers_all_children() {
        let trie = CompletionTrie::build(&corpus());
        // "new york " -> prefix=[new=2, york=6], suffix_range = whole dict (0,7)
        let range = trie.locate_prefix(&[2, 6], (0, 7));
        let mut out = Vec::new();
        trie.topk(range, 5, &mut out);
        assert_eq!(out, vec![0, 1]);
    }

    #[test]
    fn locate_prefix_no_match_is_empty() {
        let trie = CompletionTrie::build(&corpus());
        let range = trie.locate_prefix(&[], (99, 100));
        assert_eq!(range, (0, 0));
    }

    #[test]
    fn trie_serializes_round_trip() {
        let trie = CompletionTrie::build(&corpus());
        let mut buf = Vec::new();
        trie.serialize(&mut buf);
        let mut r = Reader::new(&buf);
        let back = CompletionTrie::deserialize(&mut r).unwrap();
        let range = back.locate_prefix(&[2], (6, 7));
        let mut out = Vec::new();
        back.topk(range, 3, &mut out);
        assert_eq!(out, vec![0, 1]);
    }
}
