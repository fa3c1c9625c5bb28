//! End-to-end scenarios exercising [`seqmatch::run_match`] against whole
//! pattern trees, one test per named scenario.

use std::rc::Rc;

use seqmatch::atom::{
    Any, AnyConfig, Callback, PositionAssertion, PositionAssertionConfig, PositionSpec,
    SubroutineAssertion, SubroutineAssertionConfig, WindowCallbackConfig,
};
use seqmatch::quant::QuantSpec;
use seqmatch::{
    run_match, run_match_named, Alternation, Concatenation, Length, NamedData, Pattern, RepeatSpec,
    Repetition,
};

fn any_exact(n: usize) -> Pattern<Vec<i32>> {
    Pattern::Any(Any::new(AnyConfig { name: None, quant: QuantSpec::exact(n) }))
}

#[test]
fn quantified_any_matches_exact_size() {
    let pattern = any_exact(5);
    let data: Vec<i32> = (0..10).collect();
    let result = run_match(&pattern, &data).unwrap().unwrap();
    assert_eq!(result.left, 0);
    assert_eq!(result.right, Some(4));
    assert_eq!(result.length, Length::Count(5));
}

#[test]
fn concatenation_of_two_anchors_matches_empty_data() {
    let begin = Pattern::PositionAssertion(PositionAssertion::new(PositionAssertionConfig {
        name: None,
        position: PositionSpec::Begin,
    }));
    let end = Pattern::PositionAssertion(PositionAssertion::new(PositionAssertionConfig {
        name: None,
        position: PositionSpec::End,
    }));
    let pattern: Pattern<Vec<i32>> =
        Pattern::Seq(Concatenation::new(None, vec![begin, end]).unwrap());
    let data: Vec<i32> = Vec::new();
    let result = run_match(&pattern, &data).unwrap().unwrap();
    assert_eq!(result.left, 0);
    assert_eq!(result.length, Length::ZeroButTrue);
}

fn always_fails() -> Pattern<Vec<i32>> {
    Pattern::Callback(Callback::Window(WindowCallbackConfig {
        name: None,
        quant: QuantSpec::new("0", "100%").unwrap(),
        callback: Rc::new(|_data: &Vec<i32>, _w| Ok(seqmatch::MatchOutcome::NoMatch)),
        subset_name: None,
    }))
}

fn even_run() -> Pattern<Vec<i32>> {
    // Greedy "take the largest even-length prefix of the offered window",
    // backing off by one element when the offer itself is odd.
    Pattern::Callback(Callback::Window(WindowCallbackConfig {
        name: None,
        quant: QuantSpec::new("0", "100%").unwrap(),
        callback: Rc::new(|_data: &Vec<i32>, w| {
            if w.length % 2 == 0 {
                Ok(seqmatch::MatchOutcome::Consumed(w.length))
            } else {
                Ok(seqmatch::MatchOutcome::Backoff(1))
            }
        }),
        subset_name: None,
    }))
}

#[test]
fn alternation_tries_children_in_order_and_stops_at_first_success() {
    let pattern: Pattern<Vec<i32>> = Pattern::Or(
        Alternation::new(None, vec![always_fails(), any_exact(15), even_run()]).unwrap(),
    );
    let data: Vec<i32> = (1..=19).collect();
    let result = run_match(&pattern, &data).unwrap().unwrap();
    assert_eq!(result.left, 0);
    assert_eq!(result.length, Length::Count(15));
}

#[test]
fn concatenation_backs_off_the_leading_child_to_make_room_for_the_tail() {
    let pattern: Pattern<Vec<i32>> =
        Pattern::Seq(Concatenation::new(None, vec![even_run(), any_exact(5)]).unwrap());
    let data: Vec<i32> = (1..=19).collect();
    let result = run_match(&pattern, &data).unwrap().unwrap();
    assert_eq!(result.left, 0);
    assert_eq!(result.right, Some(18));
    assert_eq!(result.length, Length::Count(19));
}

#[test]
fn repetition_of_a_fixed_size_atom_reports_one_positive_match_per_iteration() {
    let pattern: Pattern<Vec<i32>> =
        Pattern::Repeat(Box::new(Repetition::new(None, any_exact(6), RepeatSpec::Default).unwrap()));
    let data: Vec<i32> = (1..=19).collect();
    let result = run_match(&pattern, &data).unwrap().unwrap();
    assert_eq!(result.left, 0);
    assert_eq!(result.length, Length::Count(18));
    assert_eq!(result.positive_matches.len(), 3);
    let offsets: Vec<usize> = result.positive_matches.iter().map(|r| r.left).collect();
    assert_eq!(offsets, vec![0, 6, 12]);
}

#[test]
fn repeated_run_callback_splits_data_into_runs_of_equal_values() {
    // A per-element predicate can't express "equal to the run's first
    // element", so this needs the window flavor, which sees the whole
    // offered span (and can read back into `data` by index).
    let run_window = Pattern::Callback(Callback::Window(WindowCallbackConfig {
        name: None,
        quant: QuantSpec::new("0", "100%").unwrap(),
        callback: Rc::new(|data: &Vec<i32>, w| {
            if w.length == 0 {
                return Ok(seqmatch::MatchOutcome::ZeroWidth);
            }
            let first = data[w.left];
            let mut n = 0usize;
            while n < w.length && data[w.left + n] == first {
                n += 1;
            }
            Ok(seqmatch::MatchOutcome::Consumed(n))
        }),
        subset_name: None,
    }));
    let pattern: Pattern<Vec<i32>> =
        Pattern::Repeat(Box::new(Repetition::new(None, run_window, RepeatSpec::Default).unwrap()));
    let data: Vec<i32> = vec![1, 1, 1, 2, 2, 3, 4, 4, 5, 5, 5];
    let result = run_match(&pattern, &data).unwrap().unwrap();
    assert_eq!(result.length, Length::Count(11));
    let lengths: Vec<usize> = result
        .positive_matches
        .iter()
        .map(|r| r.length.as_usize())
        .collect();
    assert_eq!(lengths, vec![3, 2, 1, 2, 3]);
}

#[test]
fn position_parser_scenario() {
    assert_eq!(seqmatch::position::parse_position_clamped(10, "[30%-5]+5").unwrap(), 5);
}

#[test]
fn failed_top_level_match_leaves_no_residual_captures() {
    let pattern: Pattern<Vec<i32>> = any_exact(50);
    let data: Vec<i32> = (0..10).collect();
    let result = run_match(&pattern, &data).unwrap();
    assert!(result.is_none());
}

#[test]
fn repetition_with_count_one_is_equivalent_to_the_inner_pattern() {
    let bare = any_exact(5);
    let wrapped: Pattern<Vec<i32>> =
        Pattern::Repeat(Box::new(Repetition::new(None, any_exact(5), RepeatSpec::Exact(1)).unwrap()));
    let data: Vec<i32> = (0..10).collect();
    let bare_result = run_match(&bare, &data).unwrap().unwrap();
    let wrapped_result = run_match(&wrapped, &data).unwrap().unwrap();
    assert_eq!(bare_result.left, wrapped_result.left);
    assert_eq!(bare_result.length, wrapped_result.length);
}

#[test]
fn shared_node_can_appear_twice_in_the_same_tree() {
    let inner = Rc::new(any_exact(3));
    let pattern: Pattern<Vec<i32>> = Pattern::Seq(
        Concatenation::new(None, vec![Pattern::Shared(inner.clone()), Pattern::Shared(inner)]).unwrap(),
    );
    let data: Vec<i32> = (0..6).collect();
    let result = run_match(&pattern, &data).unwrap().unwrap();
    assert_eq!(result.left, 0);
    assert_eq!(result.length, Length::Count(6));
}

#[test]
fn named_data_dispatches_subset_name_atoms_to_their_own_container() {
    let flag_check = Pattern::SubroutineAssertion(SubroutineAssertion::new(SubroutineAssertionConfig {
        name: None,
        callback: Rc::new(|flags: &Vec<i32>, left| Ok(left < flags.len() && flags[left] == 1)),
        subset_name: Some("flags".to_string()),
    }));
    let pattern: Pattern<Vec<i32>> =
        Pattern::Seq(Concatenation::new(None, vec![any_exact(1), flag_check, any_exact(2)]).unwrap());
    let primary: Vec<i32> = vec![10, 20, 30];
    let flags: Vec<i32> = vec![0, 1, 0];
    let named = NamedData::new(&primary).insert("flags", &flags);
    let result = run_match_named(&pattern, &named).unwrap().unwrap();
    assert_eq!(result.left, 0);
    assert_eq!(result.length, Length::Count(3));
}

#[test]
fn concatenation_is_associative_in_observable_behavior() {
    let a = || any_exact(2);
    let b = || any_exact(3);
    let c = || any_exact(4);
    let flat: Pattern<Vec<i32>> = Pattern::Seq(Concatenation::new(None, vec![a(), b(), c()]).unwrap());
    let nested: Pattern<Vec<i32>> = Pattern::Seq(
        Concatenation::new(
            None,
            vec![a(), Pattern::Seq(Concatenation::new(None, vec![b(), c()]).unwrap())],
        )
        .unwrap(),
    );
    let data: Vec<i32> = (0..20).collect();
    let flat_result = run_match(&flat, &data).unwrap().unwrap();
    let nested_result = run_match(&nested, &data).unwrap().unwrap();
    assert_eq!(flat_result.left, nested_result.left);
    assert_eq!(flat_result.length, nested_result.length);
}

