use core::cmp::Ordering;
use core::fmt::{Display, Formatter};
use anyhow::Result;
use crate::game::{Game, GameCursor, GameNumber};
use crate::registry::PlayerRegistry;

pub mod big_game;

pub use big_game::{BigGameKind, BigGameLog};

/// Visitor driven over every play of every game in a batch.
pub trait Accumulator {
    fn title(&self) -> String;

    /// Label printed above the count column.
    fn header(&self) -> &'static str;

    fn threshold(&self) -> usize;

    fn is_offense(&self) -> bool;

    /// Forgets everything counted for the previous game.
    fn on_begin_game(&mut self, game: &dyn Game);

    fn on_event(&mut self, game: &dyn Game, cursor: &dyn GameCursor) -> Result<()>;

    fn on_substitution(&mut self, _game: &dyn Game, _cursor: &dyn GameCursor) -> Result<()> {
        Ok(())
    }

    fn on_end_game(&mut self, game: &dyn Game, cursor: &dyn GameCursor);

    fn entries(&self) -> &[LogEntry];
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    pub date: String,
    pub number: GameNumber,
    pub player: String,
    pub team: String,
    pub opp: String,
    pub site: String,
    pub count: usize,
}

impl LogEntry {
    /// Date, site and doubleheader number glued together as text.
    pub fn sort_key(&self) -> String {
        format!("{}{}{}", self.date, self.site, self.number)
    }
}

pub type Comparator = fn(&LogEntry, &LogEntry) -> Ordering;

pub fn chronological(a: &LogEntry, b: &LogEntry) -> Ordering {
    a.sort_key().cmp(&b.sort_key())
}

pub fn render(accumulator: &dyn Accumulator, registry: &dyn PlayerRegistry) -> String {
    render_with(accumulator, registry, chronological)
}

pub fn render_with(accumulator: &dyn Accumulator, registry: &dyn PlayerRegistry, comparator: Comparator) -> String {
    Report::new(accumulator, registry, comparator).to_string()
}

pub struct Report<'a> {
    accumulator: &'a dyn Accumulator,
    registry: &'a dyn PlayerRegistry,
    comparator: Comparator,
}

impl<'a> Report<'a> {
    pub fn new(accumulator: &'a dyn Accumulator, registry: &'a dyn PlayerRegistry, comparator: Comparator) -> Self {
        Self {
            accumulator,
            registry,
            comparator,
        }
    }
}

impl Display for Report<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let Self { accumulator, registry, comparator } = self;
        writeln!(f)?;
        writeln!(f, "{}", accumulator.title())?;
        writeln!(f)?;
        writeln!(f, "Player                         Date           Team Opp  Site  {header: >2}", header = accumulator.header())?;

        let mut entries = accumulator.entries().iter().collect::<Vec<_>>();
        // stable, so equal keys stay in the order the games were scanned
        entries.sort_by(|a, b| comparator(*a, *b));
        for entry in entries {
            let LogEntry { date, number, player, team, opp, site, count } = entry;
            let name = registry.sort_name(player).unwrap_or_else(|| player.clone());
            writeln!(f, "{name: <30} {date: >10} {marker} {team}  {opp}  {site}   {count: >2}", marker = number.marker())?;
        }

        Ok(())
    }
}
