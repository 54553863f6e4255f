use std::cmp::Ordering;
use std::collections::HashMap;

/// A double-array trie over sequences of string tokens
///
/// Used by generated code to test whether a dotted field path was already
/// consumed by a binding's path parameters or body. Tokens get integer codes in
/// first-seen order; each registered sequence is terminated by a code equal to
/// the number of distinct tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoubleArray {
    /// Token to code
    pub encoding: HashMap<String, usize>,
    /// Offset of the children of each node
    pub base: Vec<usize>,
    /// Parent of each slot, plus one; zero marks a free slot
    pub check: Vec<usize>,
}

#[derive(Debug, Clone, Copy)]
struct Node {
    row: usize,
    /// Column in the encoded sequence; `None` for the root
    col: Option<usize>,
    left: usize,
    right: usize,
}

impl Node {
    fn next_col(&self) -> usize {
        self.col.map_or(0, |c| c + 1)
    }

    fn value(&self, seqs: &[Vec<usize>]) -> usize {
        seqs[self.row][self.col.unwrap_or_default()]
    }

    fn children(&self, seqs: &[Vec<usize>]) -> Vec<Node> {
        let col = self.next_col();
        let mut result: Vec<Node> = Vec::new();
        let mut last_val = None;
        for i in self.left..self.right {
            let val = seqs[i][col];
            if last_val == Some(val) {
                continue;
            }
            last_val = Some(val);
            if let Some(prev) = result.last_mut() {
                prev.right = i;
            }
            result.push(Node {
                row: i,
                col: Some(col),
                left: i,
                right: self.right,
            });
        }
        result
    }
}

fn lexical(a: &[usize], b: &[usize]) -> Ordering {
    a.cmp(b)
}

impl DoubleArray {
    /// Build a trie holding every sequence in `seqs`.
    pub fn new<S, T>(seqs: S) -> Self
    where
        S: IntoIterator<Item = T>,
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        let mut da = DoubleArray::default();
        let mut encoded = da.register_tokens(seqs);
        if encoded.is_empty() {
            return da;
        }
        encoded.sort_by(|a, b| lexical(a, b));
        let root = Node {
            row: 0,
            col: None,
            left: 0,
            right: encoded.len(),
        };
        da.add_seqs(&encoded, 0, root);
        let used = da
            .check
            .iter()
            .rposition(|&c| c != 0)
            .map_or(0, |last| last + 1);
        da.base.truncate(used);
        da.check.truncate(used);
        da
    }

    fn terminator(&self) -> usize {
        self.encoding.len()
    }

    fn register_tokens<S, T>(&mut self, seqs: S) -> Vec<Vec<usize>>
    where
        S: IntoIterator<Item = T>,
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        let mut result = Vec::new();
        for seq in seqs {
            let mut encoded = Vec::new();
            for token in seq {
                let next = self.encoding.len();
                let code = *self
                    .encoding
                    .entry(token.as_ref().to_string())
                    .or_insert(next);
                encoded.push(code);
            }
            result.push(encoded);
        }
        let terminator = self.terminator();
        for seq in &mut result {
            seq.push(terminator);
        }
        result
    }

    fn ensure_size(&mut self, i: usize) {
        while i >= self.base.len() {
            let grow = self.base.len() + 1;
            self.base.resize(self.base.len() + grow, 0);
            self.check.resize(self.check.len() + grow, 0);
        }
    }

    fn add_seqs(&mut self, seqs: &[Vec<usize>], pos: usize, node: Node) {
        self.ensure_size(pos);
        let children = node.children(seqs);
        let mut offset = 1;
        loop {
            let mut free = true;
            for child in &children {
                let j = offset + child.value(seqs);
                self.ensure_size(j);
                if self.check[j] != 0 {
                    free = false;
                    break;
                }
            }
            if free {
                break;
            }
            offset += 1;
        }
        self.base[pos] = offset;
        for child in &children {
            self.check[offset + child.value(seqs)] = pos + 1;
        }
        let terminator = self.terminator();
        for child in &children {
            let code = child.value(seqs);
            if code != terminator {
                self.add_seqs(seqs, offset + code, *child);
            }
        }
    }

    /// Whether some registered sequence is a prefix of `seq`.
    pub fn has_common_prefix<T: AsRef<str>>(&self, seq: &[T]) -> bool {
        if self.base.is_empty() {
            return false;
        }
        let mut i = 0;
        for token in seq {
            let Some(&code) = self.encoding.get(token.as_ref()) else {
                break;
            };
            let j = self.base[i] + code;
            if self.check.get(j) != Some(&(i + 1)) {
                break;
            }
            i = j;
        }
        let j = self.base[i] + self.terminator();
        self.check.get(j) == Some(&(i + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let da = DoubleArray::new(Vec::<Vec<String>>::new());
        assert!(da.encoding.is_empty());
        assert!(da.base.is_empty());
        assert!(da.check.is_empty());
        assert!(!da.has_common_prefix(&["a"]));
    }

    #[test]
    fn test_single_token_layout() {
        let da = DoubleArray::new(vec![vec!["a"]]);
        assert_eq!(da.encoding.get("a"), Some(&0));
        assert_eq!(da.base, vec![1, 1, 0]);
        assert_eq!(da.check, vec![0, 1, 2]);
    }

    #[test]
    fn test_has_common_prefix() {
        let da = DoubleArray::new(vec![
            vec!["foo"],
            vec!["bar", "baz"],
            vec!["qux", "quux", "corge"],
        ]);
        assert!(da.has_common_prefix(&["foo"]));
        assert!(da.has_common_prefix(&["foo", "anything"]));
        assert!(da.has_common_prefix(&["bar", "baz"]));
        assert!(da.has_common_prefix(&["bar", "baz", "x"]));
        assert!(!da.has_common_prefix(&["bar"]));
        assert!(!da.has_common_prefix(&["bar", "foo"]));
        assert!(!da.has_common_prefix(&["qux", "quux"]));
        assert!(da.has_common_prefix(&["qux", "quux", "corge"]));
        assert!(!da.has_common_prefix(&["baz"]));
        assert!(!da.has_common_prefix::<&str>(&[]));
    }

    #[test]
    fn test_duplicate_sequences() {
        let da = DoubleArray::new(vec![vec!["id"], vec!["id"]]);
        assert_eq!(da.encoding.len(), 1);
        assert!(da.has_common_prefix(&["id"]));
    }

    #[test]
    fn test_shared_prefix_sequences() {
        let da = DoubleArray::new(vec![vec!["a", "b"], vec!["a", "c"]]);
        assert!(da.has_common_prefix(&["a", "b"]));
        assert!(da.has_common_prefix(&["a", "c", "d"]));
        assert!(!da.has_common_prefix(&["a"]));
        assert!(!da.has_common_prefix(&["a", "d"]));
    }
}
