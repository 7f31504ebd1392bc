use anyhow::{Context, Result};
use fxhash::FxHashMap;
use tracing::debug;
use crate::game::{EventKind, Game, GameCursor, Side};
use crate::report::{Accumulator, LogEntry};

pub const PITCHER: u8 = 1;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BigGameKind {
    HomeRuns,
    Hits,
    Strikeouts,
}

impl BigGameKind {
    pub const ALL: [BigGameKind; 3] = [Self::HomeRuns, Self::Hits, Self::Strikeouts];

    pub fn threshold(self) -> usize {
        match self {
            Self::HomeRuns => 2,
            Self::Hits => 4,
            Self::Strikeouts => 10,
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            Self::HomeRuns => "HR",
            Self::Hits => "H",
            Self::Strikeouts => "SO",
        }
    }

    pub fn title(self) -> String {
        let threshold = self.threshold();
        match self {
            Self::HomeRuns => format!("Players with at least {threshold} home runs in a game"),
            Self::Hits => format!("Players with at least {threshold} hits in a game"),
            Self::Strikeouts => format!("Pitchers with at least {threshold} strikeouts in a game"),
        }
    }

    pub fn is_offense(self) -> bool {
        !matches!(self, Self::Strikeouts)
    }

    /// The counter bumped by the current play, keyed by the side at bat.
    fn credit<'a>(self, game: &dyn Game, cursor: &'a dyn GameCursor) -> Result<Option<(Side, &'a str)>> {
        let Some(event) = cursor.event() else { return Ok(None) };
        let side = event.batting_side;
        Ok(match self {
            Self::HomeRuns if event.kind == EventKind::HomeRun => Some((side, event.batter.as_str())),
            Self::Hits if event.kind.is_hit() => Some((side, event.batter.as_str())),
            Self::Strikeouts if event.kind == EventKind::Strikeout => {
                let pitcher = cursor.fielder(event.fielding_side(), PITCHER).with_context(|| {
                    format!("Could not find the {fielding} pitcher for a strikeout of {batter} on {date}", fielding = event.fielding_side(), batter = event.batter, date = game.date())
                })?;
                Some((side, pitcher))
            }
            _ => None,
        })
    }
}

pub struct BigGameLog {
    kind: BigGameKind,
    counts: [FxHashMap<String, usize>; 2],
    entries: Vec<LogEntry>,
}

impl BigGameLog {
    pub fn new(kind: BigGameKind) -> Self {
        Self {
            kind,
            counts: Default::default(),
            entries: Vec::new(),
        }
    }

    pub fn home_runs() -> Self {
        Self::new(BigGameKind::HomeRuns)
    }

    pub fn hits() -> Self {
        Self::new(BigGameKind::Hits)
    }

    pub fn strikeouts() -> Self {
        Self::new(BigGameKind::Strikeouts)
    }

    pub fn kind(&self) -> BigGameKind {
        self.kind
    }

    /// This game's running counts, keyed by the side at bat when they happened.
    pub fn counts(&self, side: Side) -> &FxHashMap<String, usize> {
        &self.counts[side.index()]
    }
}

impl Accumulator for BigGameLog {
    fn title(&self) -> String {
        self.kind.title()
    }

    fn header(&self) -> &'static str {
        self.kind.header()
    }

    fn threshold(&self) -> usize {
        self.kind.threshold()
    }

    fn is_offense(&self) -> bool {
        self.kind.is_offense()
    }

    fn on_begin_game(&mut self, _game: &dyn Game) {
        self.counts = Default::default();
    }

    fn on_event(&mut self, game: &dyn Game, cursor: &dyn GameCursor) -> Result<()> {
        if let Some((side, player)) = self.kind.credit(game, cursor)? {
            *self.counts[side.index()].entry(player.to_owned()).or_insert(0) += 1;
        }
        Ok(())
    }

    fn on_end_game(&mut self, game: &dyn Game, _cursor: &dyn GameCursor) {
        let threshold = self.threshold();
        for side in Side::BOTH {
            let mut qualified = self.counts[side.index()]
                .iter()
                .filter(|&(_, &count)| count >= threshold)
                .collect::<Vec<_>>();
            qualified.sort_unstable_by(|a, b| a.0.cmp(b.0));

            // pitchers belong to the side in the field
            let team = if self.kind.is_offense() { side } else { side.opponent() };
            for (player, &count) in qualified {
                debug!(player = %player, count, date = game.date(), "{}", self.kind.header());
                self.entries.push(LogEntry {
                    date: game.date().to_owned(),
                    number: game.number(),
                    player: player.clone(),
                    team: game.team(team).to_owned(),
                    opp: game.team(team.opponent()).to_owned(),
                    site: game.site().to_owned(),
                    count,
                });
            }
        }
    }

    fn entries(&self) -> &[LogEntry] {
        &self.entries
    }
}
