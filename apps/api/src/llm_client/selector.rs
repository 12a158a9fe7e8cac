//! Model selector: remembers the last model that answered and orders the
//! candidate list so that model is tried first on the next call.

use std::sync::RwLock;

use tracing::info;

/// Process-wide "last known good" model. Last writer wins; no persistence.
#[derive(Debug)]
pub struct ModelSelector {
    active: RwLock<String>,
}

impl ModelSelector {
    pub fn new(default_model: impl Into<String>) -> Self {
        Self {
            active: RwLock::new(default_model.into()),
        }
    }

    pub fn active_model(&self) -> String {
        match self.active.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Overwrites the active model unconditionally.
    pub fn record_success(&self, model: &str) {
        let mut guard = match self.active.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if *guard != model {
            info!("Active model switched: {} -> {}", *guard, model);
            *guard = model.to_string();
        }
    }

    pub fn candidate_order(&self, priority: &[String]) -> Vec<String> {
        build_candidate_order(priority, &self.active_model())
    }
}

/// De-duplicates `priority` (first occurrence wins), then moves `active` to the
/// front if it is present. The relative order of everything else is kept.
pub fn build_candidate_order(priority: &[String], active: &str) -> Vec<String> {
    let mut order: Vec<String> = Vec::with_capacity(priority.len());
    for candidate in priority {
        if !order.contains(candidate) {
            order.push(candidate.clone());
        }
    }

    if let Some(pos) = order.iter().position(|c| c == active) {
        let winner = order.remove(pos);
        order.insert(0, winner);
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_recorded_success_is_promoted_to_front() {
        let selector = ModelSelector::new("gemini-2.0-flash");
        let priority = list(&["gemini-2.0-flash", "gemini-1.5-flash", "gemini-pro"]);

        selector.record_success("gemini-pro");
        let order = selector.candidate_order(&priority);

        assert_eq!(order, list(&["gemini-pro", "gemini-2.0-flash", "gemini-1.5-flash"]));
    }

    #[test]
    fn test_promotion_keeps_every_candidate_exactly_once() {
        let priority = list(&["a", "b", "c", "d", "e"]);
        for winner in &priority {
            let order = build_candidate_order(&priority, winner);
            assert_eq!(&order[0], winner);
            assert_eq!(order.len(), priority.len());
            for candidate in &priority {
                assert_eq!(order.iter().filter(|c| *c == candidate).count(), 1);
            }
        }
    }

    #[test]
    fn test_duplicates_removed_in_first_seen_order() {
        let priority = list(&["b", "a", "b", "c", "a"]);
        assert_eq!(build_candidate_order(&priority, "zzz"), list(&["b", "a", "c"]));
    }

    #[test]
    fn test_dedup_happens_before_promotion() {
        let priority = list(&["a", "b", "a", "c"]);
        assert_eq!(build_candidate_order(&priority, "c"), list(&["c", "a", "b"]));
    }

    #[test]
    fn test_unknown_active_model_is_not_promoted() {
        let selector = ModelSelector::new("gemini-exp-1206");
        let priority = list(&["gemini-2.0-flash", "gemini-pro"]);
        assert_eq!(selector.candidate_order(&priority), priority);
    }

    #[test]
    fn test_default_is_active_until_first_success() {
        let selector = ModelSelector::new("gemini-1.5-flash");
        assert_eq!(selector.active_model(), "gemini-1.5-flash");

        selector.record_success("gemini-2.0-flash");
        selector.record_success("gemini-pro");
        assert_eq!(selector.active_model(), "gemini-pro");
    }

    #[test]
    fn test_concurrent_record_success_leaves_one_of_the_writers() {
        let selector = std::sync::Arc::new(ModelSelector::new("default"));
        let handles: Vec<_> = ["a", "b", "c", "d"]
            .into_iter()
            .map(|name| {
                let selector = selector.clone();
                std::thread::spawn(move || selector.record_success(name))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let active = selector.active_model();
        assert!(["a", "b", "c", "d"].contains(&active.as_str()));
    }
}
