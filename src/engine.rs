use anyhow::Result;
use tracing::{debug, info};
use crate::game::{Game, Side};
use crate::registry::PlayerRegistry;
use crate::report::{render, Accumulator};

pub trait ProgressSink {
    /// Returns `false` to stop the batch before the next game.
    fn update(&mut self, percent: u32) -> bool;
}

impl<F: FnMut(u32) -> bool> ProgressSink for F {
    fn update(&mut self, percent: u32) -> bool {
        self(percent)
    }
}

pub fn accept_all<G>(_game: &G) -> bool {
    true
}

pub fn process_game(game: &dyn Game, accumulators: &mut [&mut dyn Accumulator]) -> Result<()> {
    for accumulator in accumulators.iter_mut() {
        accumulator.on_begin_game(game);
    }

    let mut cursor = game.cursor();
    loop {
        let Some(event) = cursor.event() else { break };
        let no_play = event.is_no_play();
        let substitution = event.has_substitution();

        if !no_play {
            for accumulator in accumulators.iter_mut() {
                accumulator.on_event(game, &*cursor)?;
            }
        }

        if substitution {
            for accumulator in accumulators.iter_mut() {
                accumulator.on_substitution(game, &*cursor)?;
            }
        }

        cursor.next_event();
    }

    for accumulator in accumulators.iter_mut() {
        accumulator.on_end_game(game, &*cursor);
    }
    debug!(date = game.date(), away = game.team(Side::Away), home = game.site(), "Processed game");
    Ok(())
}

/// Runs every game that passes `filter` through `accumulators`, in order.
///
/// Returns `Ok(false)` when `progress` asks to stop; everything gathered up to that game stays in the accumulators.
pub fn process_file<G: Game>(
    games: &[G],
    accumulators: &mut [&mut dyn Accumulator],
    filter: impl Fn(&G) -> bool,
    mut progress: Option<&mut dyn ProgressSink>,
) -> Result<bool> {
    let total = games.len();
    info!(games = total, accumulators = accumulators.len(), "Scanning games");
    for (idx, game) in games.iter().enumerate() {
        if !filter(game) {
            continue;
        }
        process_game(game, accumulators)?;
        if let Some(progress) = progress.as_deref_mut() {
            let percent = (idx as f64 / total as f64 * 100.0).round() as u32;
            if !progress.update(percent) {
                info!(processed = idx + 1, games = total, "Scan cancelled");
                return Ok(false);
            }
        }
    }
    info!(games = total, "Scan complete");
    Ok(true)
}

pub fn print_report<G: Game, A: Accumulator>(games: &[G], registry: &dyn PlayerRegistry, accumulator: &mut A) -> Result<String> {
    let mut accumulators: [&mut dyn Accumulator; 1] = [&mut *accumulator];
    process_file(games, &mut accumulators, accept_all, None)?;
    Ok(render(&*accumulator, registry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{EventKind, GameCursor, GameNumber, PlayEvent, Substitution};
    use crate::report::{BigGameLog, LogEntry};
    use crate::scorebook::{Defense, ScoredGame};

    fn play(kind: EventKind, batting_side: Side, batter: &str) -> PlayEvent {
        PlayEvent {
            kind,
            batting_side,
            batter: batter.to_owned(),
            text: String::new(),
            substitutions: Vec::new(),
        }
    }

    fn game(date: &str, events: Vec<PlayEvent>) -> ScoredGame {
        ScoredGame {
            date: date.to_owned(),
            number: GameNumber::Single,
            away: "ATL".to_owned(),
            home: "NYN".to_owned(),
            defense: Defense { away: vec!["maddg002".to_owned()], home: vec!["leital001".to_owned()] },
            events,
        }
    }

    fn two_homer_game(date: &str) -> ScoredGame {
        game(date, vec![
            play(EventKind::HomeRun, Side::Away, "jonec004"),
            play(EventKind::GenericOut, Side::Home, "piazm001"),
            play(EventKind::HomeRun, Side::Away, "jonec004"),
        ])
    }

    /// Records which hooks fire, in order.
    #[derive(Default)]
    struct Trace(Vec<String>);

    impl Accumulator for Trace {
        fn title(&self) -> String {
            String::new()
        }

        fn header(&self) -> &'static str {
            ""
        }

        fn threshold(&self) -> usize {
            0
        }

        fn is_offense(&self) -> bool {
            true
        }

        fn on_begin_game(&mut self, game: &dyn Game) {
            self.0.push(format!("begin {}", game.date()));
        }

        fn on_event(&mut self, _game: &dyn Game, cursor: &dyn GameCursor) -> Result<()> {
            self.0.push(format!("event {}", cursor.event().map_or("", |event| event.batter.as_str())));
            Ok(())
        }

        fn on_substitution(&mut self, _game: &dyn Game, cursor: &dyn GameCursor) -> Result<()> {
            self.0.push(format!("sub {}", cursor.fielder(Side::Home, 1).unwrap_or("")));
            Ok(())
        }

        fn on_end_game(&mut self, _game: &dyn Game, cursor: &dyn GameCursor) {
            self.0.push(format!("end {}", cursor.event().is_none()));
        }

        fn entries(&self) -> &[LogEntry] {
            &[]
        }
    }

    #[test]
    fn single_game_end_to_end() {
        let mut log = BigGameLog::home_runs();
        process_game(&two_homer_game("2000/05/20"), &mut [&mut log]).unwrap();
        assert_eq!(log.entries(), [LogEntry {
            date: "2000/05/20".to_owned(),
            number: GameNumber::Single,
            player: "jonec004".to_owned(),
            team: "ATL".to_owned(),
            opp: "NYN".to_owned(),
            site: "NYN".to_owned(),
            count: 2,
        }]);
    }

    #[test]
    fn no_play_never_counts() {
        let mut events = vec![play(EventKind::HomeRun, Side::Away, "jonec004"); 3];
        events[1].text = PlayEvent::NO_PLAY.to_owned();
        events[2].text = PlayEvent::NO_PLAY.to_owned();
        let mut log = BigGameLog::home_runs();
        let mut trace = Trace::default();
        process_game(&game("2000/05/20", events), &mut [&mut log, &mut trace]).unwrap();
        assert!(log.entries().is_empty());
        assert_eq!(trace.0, ["begin 2000/05/20", "event jonec004", "end true"]);
    }

    #[test]
    fn substitution_hook_fires_before_the_lineup_changes() {
        let mut events = vec![
            play(EventKind::Strikeout, Side::Away, "jonec004"),
            play(EventKind::Single, Side::Away, "jonea001"),
        ];
        events[0].substitutions.push(Substitution { side: Side::Home, position: 1, player: "benia001".to_owned() });
        // an NP line that only carries a lineup change still reports the substitution
        let mut marker = play(EventKind::Other, Side::Away, "jonea001");
        marker.text = PlayEvent::NO_PLAY.to_owned();
        marker.substitutions.push(Substitution { side: Side::Home, position: 1, player: "francj001".to_owned() });
        events.push(marker);

        let mut trace = Trace::default();
        process_game(&game("2000/05/20", events), &mut [&mut trace]).unwrap();
        assert_eq!(trace.0, [
            "begin 2000/05/20",
            "event jonec004",
            "sub leital001",
            "event jonea001",
            "sub benia001",
            "end true",
        ]);
    }

    #[test]
    fn accumulator_errors_abort_the_batch() {
        let mut bad = game("2000/05/21", vec![play(EventKind::Strikeout, Side::Away, "jonec004")]);
        bad.defense.home.clear();
        let games = [two_homer_game("2000/05/20"), bad, two_homer_game("2000/05/22")];
        let mut homers = BigGameLog::home_runs();
        let mut strikeouts = BigGameLog::strikeouts();
        let result = process_file(&games, &mut [&mut homers, &mut strikeouts], accept_all, None);
        assert!(result.is_err());
        assert_eq!(homers.entries().len(), 1);
    }

    #[test]
    fn cancellation_stops_after_the_reporting_game() {
        let games = [two_homer_game("2000/05/20"), two_homer_game("2000/05/21"), two_homer_game("2000/05/22")];
        let mut log = BigGameLog::home_runs();
        let mut seen = Vec::new();
        let mut sink = |percent: u32| {
            seen.push(percent);
            seen.len() < 2
        };
        let finished = process_file(&games, &mut [&mut log], accept_all, Some(&mut sink)).unwrap();
        assert!(!finished);
        assert_eq!(seen, [0, 33]);
        let dates = log.entries().iter().map(|entry| &*entry.date).collect::<Vec<_>>();
        assert_eq!(dates, ["2000/05/20", "2000/05/21"]);
    }

    #[test]
    fn cancel_after_first_of_two() {
        let games = [two_homer_game("2000/05/20"), two_homer_game("2000/05/21")];
        let mut log = BigGameLog::home_runs();
        let mut sink = |_: u32| false;
        assert!(!process_file(&games, &mut [&mut log], accept_all, Some(&mut sink)).unwrap());
        assert_eq!(log.entries().len(), 1);
        assert_eq!(log.entries()[0].date, "2000/05/20");
    }

    #[test]
    fn filter_skips_games_and_their_progress() {
        let games = [two_homer_game("2000/05/20"), two_homer_game("2000/05/21"), two_homer_game("2000/05/22"), two_homer_game("2000/05/23")];
        let mut log = BigGameLog::home_runs();
        let mut seen = Vec::new();
        let mut sink = |percent: u32| {
            seen.push(percent);
            true
        };
        let finished = process_file(&games, &mut [&mut log], |game: &ScoredGame| game.date != "2000/05/21", Some(&mut sink)).unwrap();
        assert!(finished);
        assert_eq!(seen, [0, 50, 75]);
        assert_eq!(log.entries().len(), 3);
    }

    #[test]
    fn empty_batch_completes() {
        let games: [ScoredGame; 0] = [];
        let mut log = BigGameLog::hits();
        assert!(process_file(&games, &mut [&mut log], accept_all, None).unwrap());
        assert!(log.entries().is_empty());
    }

    #[test]
    fn print_report_scans_and_renders() {
        let games = [two_homer_game("2000/05/20")];
        let names = |id: &str| (id == "jonec004").then(|| "Jones, Chipper".to_owned());
        let text = print_report(&games, &names, &mut BigGameLog::home_runs()).unwrap();
        assert!(text.starts_with("\nPlayers with at least 2 home runs in a game\n"));
        assert!(text.contains("Jones, Chipper"));
        assert!(text.ends_with("ATL  NYN  NYN    2\n"));
    }
}
