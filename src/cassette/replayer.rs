//! Serves recorded interactions back in order.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Interaction};

/// Hands out interactions from a cassette, one queue per `port::method`.
#[derive(Debug)]
pub struct CassetteReplayer {
    queues: HashMap<String, VecDeque<Interaction>>,
}

fn queue_key(port: &str, method: &str) -> String {
    format!("{port}::{method}")
}

impl CassetteReplayer {
    /// Build a replayer from a loaded cassette, ordered by `seq`.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut interactions = cassette.interactions.clone();
        interactions.sort_by_key(|i| i.seq);

        let mut queues: HashMap<String, VecDeque<Interaction>> = HashMap::new();
        for interaction in interactions {
            queues
                .entry(queue_key(&interaction.port, &interaction.method))
                .or_default()
                .push_back(interaction);
        }
        Self { queues }
    }

    /// Take the next interaction for `port::method`.
    ///
    /// # Panics
    ///
    /// Panics if the cassette has no (more) interactions for the pair; a
    /// replayed run must never make more calls than were recorded.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Interaction {
        let key = queue_key(port, method);
        let Some(queue) = self.queues.get_mut(&key) else {
            let mut available: Vec<&str> = self.queues.keys().map(String::as_str).collect();
            available.sort_unstable();
            panic!(
                "Cassette exhausted: no interactions recorded for {key}. Available: [{}]",
                available.join(", ")
            );
        };
        queue.pop_front().unwrap_or_else(|| {
            panic!("Cassette exhausted: every recorded {key} interaction has been consumed.")
        })
    }
}
