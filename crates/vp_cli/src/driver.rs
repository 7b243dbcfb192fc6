//! Drives a sequencer on the tokio clock.

use rand::Rng;
use tokio::time::{sleep_until, Instant};
use vp_core::{CompletedRun, RevealEvent, RevealSequencer};

/// Sleep from deadline to deadline until no timer is pending, handing each
/// event to `on_event`. Returns the completed run, if one finished.
pub async fn run_until_idle<R: Rng>(
    seq: &mut RevealSequencer<R>,
    origin: Instant,
    mut on_event: impl FnMut(&RevealSequencer<R>, &RevealEvent),
) -> Option<CompletedRun> {
    let mut completed = None;
    while let Some(deadline) = seq.next_deadline() {
        sleep_until(origin + deadline).await;
        let now = origin.elapsed().max(deadline);
        for event in seq.advance(now) {
            on_event(seq, &event);
            if let RevealEvent::Completed(run) = event {
                completed = Some(run);
            }
        }
    }
    completed
}

#[cfg(test)]
mod tests {
    use super::*;
    use vp_core::{ExclusionSet, RevealTiming, Roster, StartOutcome};

    #[tokio::test]
    async fn test_run_until_idle_completes_once() {
        let mut seq = RevealSequencer::seeded(Roster::fallback(), RevealTiming::instant(), 1);
        let origin = Instant::now();
        let outcome = seq.start(origin.elapsed(), &ExclusionSet::new()).unwrap();
        assert_eq!(outcome, StartOutcome::Started);

        let mut completions = 0;
        let run = run_until_idle(&mut seq, origin, |_, e| {
            if matches!(e, RevealEvent::Completed(_)) {
                completions += 1;
            }
        })
        .await;

        assert_eq!(completions, 1);
        assert_eq!(run.map(|r| r.agents.len()), Some(5));
        assert!(!seq.is_busy());
    }

    #[tokio::test]
    async fn test_reroll_reports_no_completion() {
        let timing = RevealTiming { reroll_flicker_ticks: 2, ..RevealTiming::instant() };
        let mut seq = RevealSequencer::seeded(Roster::fallback(), timing, 2);
        let origin = Instant::now();
        seq.start(origin.elapsed(), &ExclusionSet::new()).unwrap();
        run_until_idle(&mut seq, origin, |_, _| {}).await;

        assert!(seq.reroll(0, origin.elapsed(), &ExclusionSet::new()));
        let mut frames = 0;
        let run = run_until_idle(&mut seq, origin, |_, e| {
            if matches!(e, RevealEvent::RerollFrame { .. }) {
                frames += 1;
            }
        })
        .await;
        assert!(run.is_none());
        assert_eq!(frames, 2);
    }
}
