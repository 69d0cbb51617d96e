use std::time::{Duration, Instant};

use topicwheel::prompts::PromptPool;
use topicwheel::selection::ResolvePolicy;
use topicwheel::session::{Intent, SelectionResult, Session, SessionConfig};

// Whole-session behaviour checked across many seeds.

const DELAY: Duration = Duration::from_secs(5);

fn session(prompts: &[&str], seed: u64) -> Session {
    Session::new(
        PromptPool::new(prompts.iter().map(|p| p.to_string()).collect()),
        SessionConfig {
            timer_minutes: 5,
            spin_delay: DELAY,
            policy: ResolvePolicy::Live,
            seed: Some(seed),
        },
    )
}

fn spin(session: &mut Session, now: &mut Instant) -> SelectionResult {
    session.apply(Intent::Spin, *now);
    *now += DELAY;
    session.apply(Intent::Tick(DELAY), *now);
    session
        .result()
        .cloned()
        .expect("spin should have resolved")
}

#[test]
fn no_repeats_until_exhausted_for_many_seeds() {
    let prompts = ["a", "b", "c", "d", "e"];

    for seed in 0..50 {
        let mut s = session(&prompts, seed);
        let mut now = Instant::now();
        let mut seen = Vec::new();

        for _ in 0..prompts.len() {
            match spin(&mut s, &mut now) {
                SelectionResult::Prompt(p) => {
                    assert!(!seen.contains(&p), "seed {seed} repeated {p}");
                    seen.push(p);
                }
                SelectionResult::Exhausted => panic!("seed {seed} exhausted early"),
            }
        }

        assert_eq!(s.history(), seen.as_slice());
        assert_eq!(spin(&mut s, &mut now), SelectionResult::Exhausted);
        assert_eq!(s.history().len(), prompts.len());
    }
}

#[test]
fn reset_makes_every_prompt_eligible_again() {
    let prompts = ["x", "y", "z"];
    let mut s = session(&prompts, 99);
    let mut now = Instant::now();

    for _ in 0..prompts.len() {
        spin(&mut s, &mut now);
    }
    s.apply(Intent::ResetWheel, now);

    let mut after_reset = Vec::new();
    for _ in 0..prompts.len() {
        if let SelectionResult::Prompt(p) = spin(&mut s, &mut now) {
            after_reset.push(p);
        }
    }
    after_reset.sort();
    assert_eq!(after_reset, vec!["x", "y", "z"]);
}

#[test]
fn first_pick_is_roughly_uniform() {
    let prompts = ["a", "b", "c", "d"];
    let mut counts = [0u32; 4];

    for seed in 0..400 {
        let mut s = session(&prompts, seed);
        let mut now = Instant::now();
        if let SelectionResult::Prompt(p) = spin(&mut s, &mut now) {
            let idx = prompts.iter().position(|q| *q == p).unwrap();
            counts[idx] += 1;
        }
    }

    // 100 expected per prompt
    for count in counts {
        assert!((50..=150).contains(&count), "skewed counts: {counts:?}");
    }
}

#[test]
fn scenario_two_prompts() {
    let mut s = session(&["A", "B"], 7);
    let mut now = Instant::now();

    let first = spin(&mut s, &mut now);
    assert_eq!(s.history(), &[first.text().to_string()]);

    let second = spin(&mut s, &mut now);
    let mut both = vec![first.text().to_string(), second.text().to_string()];
    both.sort();
    assert_eq!(both, vec!["A", "B"]);

    assert_eq!(spin(&mut s, &mut now), SelectionResult::Exhausted);
    assert_eq!(s.history().len(), 2);
}

#[test]
fn scenario_add_prompt_trimming() {
    let mut s = session(&["A"], 1);
    let now = Instant::now();

    s.apply(Intent::AddPrompt("  ".into()), now);
    assert_eq!(s.pool().len(), 1);

    s.apply(Intent::AddPrompt(" C ".into()), now);
    assert_eq!(s.pool().iter().collect::<Vec<_>>(), vec!["A", "C"]);
}

#[test]
fn scenario_timer_two_minutes() {
    let mut s = session(&["A"], 1);
    let now = Instant::now();

    s.apply(Intent::SetDurationMinutes(2), now);
    assert_eq!(s.timer().remaining_secs(), 120);

    s.apply(Intent::StartTimer, now);
    for _ in 0..3 {
        s.apply(Intent::Tick(Duration::from_secs(1)), now);
    }
    assert_eq!(s.timer().remaining_secs(), 117);
    assert!(s.timer().is_running());

    s.apply(Intent::Tick(Duration::from_secs(500)), now);
    assert_eq!(s.timer().remaining_secs(), 0);
    assert!(!s.timer().is_running());
}
