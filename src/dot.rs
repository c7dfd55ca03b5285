//! Graphviz rendering of a queue's ring, for debugging.

use std::fmt::Write as _;

use crate::queue::Queue;

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}

impl Queue {
    /// Renders the ring as a DOT digraph.
    ///
    /// Nodes are named by position (`node0`, `node1`, ...) so equal payloads
    /// stay distinct. Forward links are drawn in blue from `head` to the
    /// tail; backward links in red from the tail back to `head`.
    ///
    /// ```rust
    /// use ring_queue::Queue;
    ///
    /// let queue = Queue::try_from_iter(["a", "b"]).unwrap();
    /// let dot = queue.to_dot();
    /// assert!(dot.contains("head -> node0 -> node1 [color=blue];"));
    /// assert!(dot.contains("node1 -> node0 -> head [color=red];"));
    /// ```
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph queue {\n");
        dot.push_str("    rankdir=LR;\n");
        dot.push_str("    head [shape=plaintext, label=\"head\"];\n");

        let mut count = 0usize;
        for (i, value) in self.iter().enumerate() {
            // Writing into a String cannot fail.
            let _ = writeln!(dot, "    node{i} [shape=box, label=\"{}\"];", escape(value));
            count = i + 1;
        }

        if count > 0 {
            let forward: Vec<String> = (0..count).map(|i| format!("node{i}")).collect();
            let _ = writeln!(dot, "    head -> {} [color=blue];", forward.join(" -> "));

            let backward: Vec<String> = (0..count).rev().map(|i| format!("node{i}")).collect();
            let _ = writeln!(dot, "    {} -> head [color=red];", backward.join(" -> "));
        }

        dot.push_str("}\n");
        dot
    }
}
