//! Serves recorded interactions back in order.

use std::collections::HashMap;

use super::format::{Cassette, Interaction};

#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct PortMethodKey {
    port: String,
    method: String,
}

/// Replays a cassette, keeping an independent cursor per port/method pair.
pub struct CassetteReplayer {
    queues: HashMap<PortMethodKey, Vec<Interaction>>,
    cursors: HashMap<PortMethodKey, usize>,
}

impl CassetteReplayer {
    /// Index a loaded cassette for replay.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<PortMethodKey, Vec<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            let key = PortMethodKey {
                port: interaction.port.clone(),
                method: interaction.method.clone(),
            };
            queues.entry(key).or_default().push(interaction.clone());
        }
        let cursors = queues.keys().map(|k| (k.clone(), 0)).collect();
        Self { queues, cursors }
    }

    /// Return the next interaction for `port::method`.
    ///
    /// # Panics
    ///
    /// Panics when the cassette has no (more) interactions for the pair. A
    /// replay that diverges from the recording is a broken test, not a
    /// recoverable condition.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> &Interaction {
        let key = PortMethodKey { port: port.to_string(), method: method.to_string() };

        let Some(queue) = self.queues.get(&key) else {
            let mut available: Vec<String> =
                self.queues.keys().map(|k| format!("{}::{}", k.port, k.method)).collect();
            available.sort();
            panic!(
                "Cassette exhausted: no interactions recorded for port={port:?} method={method:?}. \
                 Available port::method pairs: [{}]",
                available.join(", ")
            );
        };

        let cursor = self.cursors.get_mut(&key).expect("cursor exists for every queue");
        assert!(
            *cursor < queue.len(),
            "Cassette exhausted: all {count} interactions for port={port:?} method={method:?} \
             have been consumed. Last interaction was seq={last_seq}.",
            count = queue.len(),
            last_seq = queue.last().map_or(0, |i| i.seq),
        );

        let interaction = &queue[*cursor];
        *cursor += 1;
        interaction
    }
}
