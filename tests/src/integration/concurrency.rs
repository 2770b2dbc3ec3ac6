//! # Concurrency Scenarios
//!
//! Several threads propagate into the same records at once. Grades must only
//! go up and every confirmation must be published exactly once.

#[cfg(test)]
mod tests {
    use crate::fixtures::{
        build_branch_chain, build_chain, build_random_dag, init_test_logging, RecordingSetup,
    };
    use finality_gadget::adapters::InMemoryTangle;
    use finality_gadget::{
        ConfirmationEvent, FinalityConfig, Gadget, GradeOfFinality, HasGradeOfFinality,
        MessageDag, UtxoDag,
    };
    use parking_lot::Mutex;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use shared_types::MessageId;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicBool, Ordering};

    const THREADS: usize = 8;

    /// Messages reachable from `tip` along strong parents, tip included.
    fn past_cone(tangle: &InMemoryTangle, tip: MessageId) -> HashSet<MessageId> {
        let mut cone = HashSet::new();
        let mut pending = vec![tip];
        while let Some(id) = pending.pop() {
            if cone.insert(id) {
                pending.extend(tangle.strong_parents(&id));
            }
        }
        cone
    }

    fn event_counts(events: &[ConfirmationEvent]) -> HashMap<ConfirmationEvent, usize> {
        let mut counts = HashMap::new();
        for event in events {
            *counts.entry(event.clone()).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn test_concurrent_markers_confirm_each_message_once() {
        init_test_logging();
        let setup = RecordingSetup::new(FinalityConfig::default());
        let dag = build_random_dag(&setup.tangle, 400, 7);

        std::thread::scope(|scope| {
            for t in 0..THREADS {
                let gadget = &setup.gadget;
                let mut markers = dag.markers.clone();
                scope.spawn(move || {
                    markers.shuffle(&mut StdRng::seed_from_u64(t as u64));
                    for marker in &markers {
                        gadget.handle_marker(marker, 0.9).unwrap();
                    }
                });
            }
        });

        let tip = dag.messages[dag.messages.len() - 1];
        let cone = past_cone(&setup.tangle, tip);
        for id in &cone {
            let grade = setup
                .tangle
                .message_metadata(id)
                .unwrap()
                .grade_of_finality();
            assert_eq!(grade, GradeOfFinality::High, "message {id}");
        }

        let counts = event_counts(&setup.events.events());
        assert!(counts.values().all(|count| *count == 1));
        for id in &cone {
            assert_eq!(
                counts.get(&ConfirmationEvent::MessageConfirmed(*id)),
                Some(&1)
            );
        }
    }

    #[test]
    fn test_racing_weights_end_at_highest_grade() {
        init_test_logging();
        let setup = RecordingSetup::new(FinalityConfig::default());
        let chain = build_chain(&setup.tangle, 50, 10);
        let weights = [0.2, 0.3, 0.5, 0.25, 0.45, 0.9];

        std::thread::scope(|scope| {
            for t in 0..THREADS {
                let gadget = &setup.gadget;
                let chain = &chain;
                scope.spawn(move || {
                    let mut order = weights.to_vec();
                    order.shuffle(&mut StdRng::seed_from_u64(100 + t as u64));
                    for weight in order {
                        for marker in &chain.markers {
                            gadget.handle_marker(marker, weight).unwrap();
                        }
                    }
                });
            }
        });

        for (message_id, transaction_id) in chain.messages.iter().zip(&chain.transactions) {
            let message = setup.tangle.message_metadata(message_id).unwrap();
            let transaction = setup.tangle.transaction_metadata(transaction_id).unwrap();
            assert_eq!(message.grade_of_finality(), GradeOfFinality::High);
            assert_eq!(transaction.grade_of_finality(), GradeOfFinality::High);
        }

        // One message and one transaction event per chain link
        let events = setup.events.events();
        assert_eq!(events.len(), 100);
        assert!(event_counts(&events).values().all(|count| *count == 1));
    }

    #[test]
    fn test_grades_never_decrease_under_concurrent_updates() {
        init_test_logging();
        let setup = RecordingSetup::new(FinalityConfig::default());
        let chain = build_chain(&setup.tangle, 60, 6);
        let branch = build_branch_chain(&setup.tangle, 10_000, 20);
        let done = AtomicBool::new(false);
        let violations = Mutex::new(Vec::new());

        std::thread::scope(|scope| {
            // Observer samples every record and remembers the last grade seen
            scope.spawn(|| {
                let mut seen: HashMap<MessageId, GradeOfFinality> = HashMap::new();
                while !done.load(Ordering::Acquire) {
                    for id in &chain.messages {
                        let grade = setup
                            .tangle
                            .message_metadata(id)
                            .map(|m| m.grade_of_finality())
                            .unwrap_or_default();
                        let previous = seen.insert(*id, grade).unwrap_or_default();
                        if grade < previous {
                            violations.lock().push((*id, previous, grade));
                        }
                    }
                }
            });

            let workers: Vec<_> = (0..THREADS)
                .map(|t| {
                    let gadget = &setup.gadget;
                    let chain = &chain;
                    let branch = &branch;
                    scope.spawn(move || {
                        for round in 0..20 {
                            let weight = 0.15 + ((t + round) % 8) as f64 * 0.05;
                            for marker in &chain.markers {
                                gadget.handle_marker(marker, weight).unwrap();
                            }
                            gadget.handle_branch(&branch.branch_id, weight).unwrap();
                        }
                    })
                })
                .collect();

            for worker in workers {
                worker.join().unwrap();
            }
            done.store(true, Ordering::Release);
        });

        let violations = violations.into_inner();
        assert!(violations.is_empty(), "grades went down: {violations:?}");
        assert!(event_counts(&setup.events.events())
            .values()
            .all(|count| *count == 1));
    }

    #[test]
    fn test_concurrent_branch_updates_publish_branch_once() {
        init_test_logging();
        let setup = RecordingSetup::new(FinalityConfig::default());
        let branch = build_branch_chain(&setup.tangle, 20_000, 30);
        for message_id in &branch.attachments {
            setup
                .tangle
                .message_metadata(message_id)
                .unwrap()
                .raise_grade_of_finality(GradeOfFinality::High);
        }

        std::thread::scope(|scope| {
            for t in 0..THREADS {
                let gadget = &setup.gadget;
                let branch_id = branch.branch_id;
                scope.spawn(move || {
                    let weight = if t % 2 == 0 { 0.6 } else { 0.35 };
                    gadget.handle_branch(&branch_id, weight).unwrap();
                });
            }
        });

        for id in &branch.transactions {
            let grade = setup
                .tangle
                .transaction_metadata(id)
                .unwrap()
                .grade_of_finality();
            assert_eq!(grade, GradeOfFinality::High);
        }
        assert_eq!(
            setup
                .events
                .count(&ConfirmationEvent::BranchConfirmed(branch.branch_id)),
            1
        );
        for id in &branch.transactions {
            assert_eq!(
                setup.events.count(&ConfirmationEvent::TransactionConfirmed(*id)),
                1
            );
        }
    }
}
