//! Property-Based Tests for the practice engine
//!
//! Tests the following invariants:
//! - Determinism: same seed, topic and level give the same problem
//! - Non-degeneracy: every served instance satisfies its family's constraints
//! - Fallbacks: the deterministic fallback is valid at every level
//! - Reflexivity: the key's own answer is always graded correct
//! - Fraction equivalence: scaled forms are equal in value, flagged when unreduced
//! - Difficulty: levels stay in bounds, move by one, streaks reset whenever a
//!   threshold is reached, and mastery is reported once

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use practice_engine::difficulty::advance;
use practice_engine::domain::{AnswerKey, Operands, ProblemInstance, ProblemSource};
use practice_engine::generator::DISTRACTOR_COUNT;
use practice_engine::seeds::fallback_operands;
use practice_engine::{
    generate, generate_with_attempts, validate, DifficultyPolicy, DifficultyState, Fraction, LevelChange, Submission, TopicId, Verdict,
};

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_topic() -> impl Strategy<Value = TopicId> {
    proptest::sample::select(TopicId::ALL.to_vec())
}

fn arb_topic_level() -> impl Strategy<Value = (TopicId, u8)> {
    arb_topic().prop_flat_map(|topic| {
        let (min, max) = topic.supported_levels();
        (Just(topic), min..=max)
    })
}

fn arb_policy() -> impl Strategy<Value = DifficultyPolicy> {
    (1u8..=3, 0u8..=3, 1u32..=4, 1u32..=4).prop_map(|(min_level, span, raise_after, lower_after)| DifficultyPolicy {
        min_level,
        max_level: min_level + span,
        raise_after,
        lower_after,
    })
}

fn problem(operands: Operands) -> ProblemInstance {
    ProblemInstance {
        id: uuid::Uuid::nil(),
        topic: operands.topic(),
        level: 1,
        correct_answer: operands.solve(),
        operands,
        narrative_fields: Default::default(),
        source: ProblemSource::Fallback,
    }
}

// ============================================================================
// Generator properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_same_seed_same_problem((topic, level) in arb_topic_level(), seed in any::<u64>()) {
        let a = generate(topic, level, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
        let b = generate(topic, level, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
        prop_assert_eq!(a.id, b.id);
        prop_assert_eq!(&a.operands, &b.operands);
        prop_assert_eq!(&a.correct_answer, &b.correct_answer);
        prop_assert_eq!(&a.narrative_fields, &b.narrative_fields);
    }

    #[test]
    fn prop_served_instances_are_valid((topic, level) in arb_topic_level(), seed in any::<u64>()) {
        let p = generate(topic, level, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
        prop_assert_eq!(p.topic, topic);
        prop_assert_eq!(p.level, level);
        prop_assert_eq!(p.operands.violation(level), None);
        prop_assert_eq!(&p.correct_answer, &p.operands.solve());
    }

    #[test]
    fn prop_fallbacks_are_valid((topic, level) in arb_topic_level()) {
        let operands = fallback_operands(topic, level);
        prop_assert_eq!(operands.topic(), topic);
        prop_assert_eq!(operands.violation(level), None);
        let p = generate_with_attempts(topic, level, 0, &mut ChaCha8Rng::seed_from_u64(0)).unwrap();
        prop_assert_eq!(p.source, ProblemSource::Fallback);
        prop_assert_eq!(&p.operands, &operands);
    }

    #[test]
    fn prop_correct_answer_is_accepted((topic, level) in arb_topic_level(), seed in any::<u64>()) {
        let p = generate(topic, level, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
        let result = validate(&p, &p.correct_answer.as_submission()).unwrap();
        prop_assert!(result.is_correct(), "{} L{}: {:?}", topic, level, p.operands);
    }

    #[test]
    fn prop_multiple_choice_has_three_wrong_options((topic, level) in arb_topic_level(), seed in any::<u64>()) {
        let p = generate(topic, level, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
        if let AnswerKey::MultipleChoice { correct, distractors } = &p.correct_answer {
            prop_assert_eq!(distractors.len(), DISTRACTOR_COUNT);
            prop_assert!(distractors.iter().all(|d| d.value != *correct && !d.value.is_negative()));
            let options = p.correct_answer.options();
            prop_assert_eq!(options.len(), DISTRACTOR_COUNT + 1);
            prop_assert!(options.windows(2).all(|w| w[0].numeric_cmp(&w[1]).is_lt()));
        }
    }

    #[test]
    fn prop_explanations_cover_every_miss((topic, level) in arb_topic_level(), seed in any::<u64>()) {
        let p = generate(topic, level, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
        let e = practice_engine::explain::explain(&p, &Verdict::Incorrect);
        prop_assert!(!e.steps.is_empty());
        prop_assert_eq!(e.answer, p.correct_answer.display());
    }
}

// ============================================================================
// Fraction properties
// ============================================================================

proptest! {
    #[test]
    fn prop_scaled_fractions_are_equivalent(n in 1u64..50, d in 1u64..50, k in 1u64..20) {
        let base = Fraction::new(n as i64, d as i64).unwrap();
        let scaled = Fraction::new((n * k) as i64, (d * k) as i64).unwrap();
        prop_assert!(base.equivalent(&scaled));
        prop_assert_eq!(base.reduced(), scaled.reduced());
    }

    #[test]
    fn prop_unreduced_simplify_answers_are_flagged(d in 4u64..40, n_seed in 1u64..40, k in 2u64..6) {
        let n = 1 + n_seed % (d - 1);
        let fraction = Fraction::new((n * k) as i64, (d * k) as i64).unwrap();
        let p = problem(Operands::FractionSimplify { fraction });
        let reduced = fraction.reduced();
        let scaled = format!("{}/{}", reduced.numerator * 2, reduced.denominator * 2);

        prop_assert_eq!(validate(&p, &Submission::Text(reduced.to_string())).unwrap().verdict, Verdict::Correct);
        prop_assert_eq!(validate(&p, &Submission::Text(scaled)).unwrap().verdict, Verdict::NotSimplified);
    }

    #[test]
    fn prop_fraction_sums_accept_any_equivalent_form(a in 1u64..6, b in 1u64..6, k in 1u64..5) {
        let left = Fraction::new(a as i64, 7).unwrap();
        let right = Fraction::new(b as i64, 9).unwrap();
        let p = problem(Operands::FractionAdd { left, right });
        let sum = left.add(&right);
        let typed = format!("{}/{}", sum.numerator * k as i64, sum.denominator * k as i64);
        prop_assert!(validate(&p, &Submission::Text(typed)).unwrap().is_correct());
    }
}

// ============================================================================
// Difficulty properties
// ============================================================================

proptest! {
    #[test]
    fn prop_levels_stay_in_bounds(policy in arb_policy(), answers in proptest::collection::vec(any::<bool>(), 0..60)) {
        let mut state = DifficultyState::new(&policy);
        for correct in answers {
            let t = advance(&state, &policy, correct);
            prop_assert!(t.state.level >= policy.min_level && t.state.level <= policy.max_level);
            prop_assert!((t.state.level as i16 - state.level as i16).abs() <= 1);
            if t.change != LevelChange::Unchanged {
                prop_assert_eq!(t.state.consecutive_correct, 0);
                prop_assert_eq!(t.state.consecutive_incorrect, 0);
            }
            prop_assert!(t.state.consecutive_correct == 0 || t.state.consecutive_incorrect == 0);
            state = t.state;
        }
    }

    #[test]
    fn prop_exact_streak_raises_once(policy in arb_policy()) {
        prop_assume!(policy.max_level > policy.min_level);
        let mut state = DifficultyState::new(&policy);
        let mut raises = 0;
        for _ in 0..policy.raise_after {
            let t = advance(&state, &policy, true);
            raises += (t.change == LevelChange::Raised) as u32;
            state = t.state;
        }
        prop_assert_eq!(raises, 1);
        prop_assert_eq!(state.level, policy.min_level + 1);
        prop_assert_eq!(state.consecutive_correct, 0);
    }

    #[test]
    fn prop_threshold_at_a_bound_clears_both_streaks(policy in arb_policy(), correct in any::<bool>()) {
        let (level, threshold) = if correct {
            (policy.max_level, policy.raise_after)
        } else {
            (policy.min_level, policy.lower_after)
        };
        let mut state = DifficultyState::at_level(level);
        for _ in 0..threshold {
            let t = advance(&state, &policy, correct);
            prop_assert_eq!(t.change, LevelChange::Unchanged);
            state = t.state;
        }
        prop_assert_eq!(state.level, level);
        prop_assert_eq!(state.consecutive_correct, 0);
        prop_assert_eq!(state.consecutive_incorrect, 0);
    }

    #[test]
    fn prop_mastery_is_reported_at_most_once(policy in arb_policy(), answers in proptest::collection::vec(any::<bool>(), 1..60)) {
        let mut state = DifficultyState::new(&policy);
        let mut reports = 0u32;
        for correct in answers {
            let t = advance(&state, &policy, correct);
            reports += t.mastery_reached as u32;
            state = t.state;
        }
        prop_assert!(reports <= 1);
        prop_assert_eq!(reports == 1, state.mastered);
        if policy.min_level == policy.max_level {
            prop_assert_eq!(reports, 1);
        }
    }

    #[test]
    fn prop_out_of_bounds_levels_are_clamped(policy in arb_policy(), level in 0u8..10, correct in any::<bool>()) {
        let t = advance(&DifficultyState::at_level(level), &policy, correct);
        prop_assert!(t.state.level >= policy.min_level && t.state.level <= policy.max_level);
    }
}

#[test]
fn topics_cover_every_family() {
    assert_eq!(TopicId::ALL.len(), 13);
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    for topic in TopicId::ALL {
        let p = generate(topic, 1, &mut rng).unwrap();
        assert_eq!(p.operands.topic(), topic);
        assert!(matches!(p.source, ProblemSource::Sampled { .. } | ProblemSource::Fallback));
    }
}
