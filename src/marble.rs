//! The marble game: players take turns placing marbles into a circle, and
//! every 23rd marble scores instead of being placed.

use std::num::ParseIntError;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex_lite::Regex;
use thiserror::Error;
use tracing::{debug, trace};

use crate::paged_seq::{PageConfig, PagedSeq};

pub type Marble = u64;

const SCORING_MULTIPLE: Marble = 23;
const PLACE_OFFSET: usize = 2;
const REMOVE_OFFSET: usize = 7;

static SETUP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+) players; last marble is worth (\d+) points$").unwrap()
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected line format: {0}")]
    Syntax(String),
    #[error(transparent)]
    Number(#[from] ParseIntError),
    #[error("game needs at least one player")]
    NoPlayers,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Setup {
    players: usize,
    last_marble: Marble,
}

impl Setup {
    pub fn new(players: usize, last_marble: Marble) -> Result<Self, ParseError> {
        if players == 0 {
            return Err(ParseError::NoPlayers);
        }
        Ok(Setup { players, last_marble })
    }

    pub fn players(&self) -> usize {
        self.players
    }

    pub fn last_marble(&self) -> Marble {
        self.last_marble
    }

    /// Same players, with the last marble worth `factor` times as much.
    pub fn scaled(&self, factor: Marble) -> Setup {
        Setup {
            players: self.players,
            last_marble: self.last_marble * factor,
        }
    }
}

impl FromStr for Setup {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let Some(caps) = SETUP_RE.captures(s) else {
            return Err(ParseError::Syntax(s.to_owned()));
        };
        let players = caps[1].parse::<usize>()?;
        let last_marble = caps[2].parse::<Marble>()?;
        Setup::new(players, last_marble)
    }
}

/// The circle of marbles plus the position of the current marble.
#[derive(Debug)]
pub struct MarbleGame {
    circle: PagedSeq<Marble>,
    current: usize,
}

impl MarbleGame {
    pub fn new() -> Self {
        Self::with_config(PageConfig::default())
    }

    pub fn with_config(config: PageConfig) -> Self {
        let mut circle = PagedSeq::with_config(config);
        circle.insert_at(0, 0);
        trace!(?config, "new marble game");
        MarbleGame { circle, current: 0 }
    }

    pub fn len(&self) -> usize {
        self.circle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.circle.is_empty()
    }

    pub fn current_marble(&self) -> Option<Marble> {
        self.circle.get(self.current).copied()
    }

    pub fn marbles(&self) -> Vec<Marble> {
        self.circle.fold(Vec::with_capacity(self.circle.len()), |mut acc, &m| {
            acc.push(m);
            acc
        })
    }

    /// Plays `marble` and returns what the turn scored.
    pub fn take_turn(&mut self, marble: Marble) -> Marble {
        if marble > 0 && marble % SCORING_MULTIPLE == 0 {
            marble + self.remove_counter_clockwise()
        } else {
            self.place(marble);
            0
        }
    }

    fn place(&mut self, marble: Marble) {
        let len = self.circle.len();
        let pos = if len == 0 { 0 } else { (self.current + PLACE_OFFSET) % len };
        self.circle.insert_at(pos, marble);
        self.current = pos;
    }

    fn remove_counter_clockwise(&mut self) -> Marble {
        let len = self.circle.len();
        // Reduce the offset first so circles shorter than it still wrap.
        let pos = if len == 0 {
            0
        } else {
            (self.current + len - REMOVE_OFFSET % len) % len
        };
        let removed = self.circle.remove_at(pos);
        // Removing the last marble wraps the current one around to the front.
        let len = self.circle.len();
        self.current = if len == 0 { 0 } else { pos % len };
        removed
    }
}

impl Default for MarbleGame {
    fn default() -> Self {
        Self::new()
    }
}

/// Plays a whole game and returns the winning score.
pub fn play(setup: &Setup, config: PageConfig) -> Marble {
    debug!(players = setup.players, last_marble = setup.last_marble, "starting game");
    let mut game = MarbleGame::with_config(config);
    let mut scores: Vec<Marble> = vec![0; setup.players];
    for marble in 1..=setup.last_marble {
        let player = ((marble - 1) % setup.players as Marble) as usize;
        scores[player] += game.take_turn(marble);
    }
    let best = scores.into_iter().max().unwrap_or(0);
    debug!(score = best, circle = game.len(), "game over");
    best
}

#[cfg(test)]
mod test {
    use super::*;
    use test_case::test_case;

    // Rotates the circle so it starts at marble 0.
    fn from_zero(game: &MarbleGame) -> Vec<Marble> {
        let mut marbles = game.marbles();
        let zero = marbles.iter().position(|&m| m == 0).unwrap();
        marbles.rotate_left(zero);
        marbles
    }

    #[test_case(9, 25 => 32)]
    #[test_case(10, 1_618 => 8_317)]
    #[test_case(13, 7_999 => 146_373)]
    #[test_case(17, 1_104 => 2_764)]
    #[test_case(21, 6_111 => 54_718)]
    #[test_case(30, 5_807 => 37_305)]
    fn known_winning_scores(players: usize, last_marble: Marble) -> Marble {
        play(&Setup::new(players, last_marble).unwrap(), PageConfig::default())
    }

    #[test_case(1, 0)]
    #[test_case(2, 1)]
    #[test_case(8, 3)]
    #[test_case(64, 64)]
    fn page_sizes_do_not_change_scores(max: usize, min: usize) {
        let config = PageConfig::new(max, min).unwrap();
        let setup = Setup::new(10, 1_618).unwrap();
        assert_eq!(play(&setup, config), 8_317);
        let setup = Setup::new(13, 7_999).unwrap();
        assert_eq!(play(&setup, config), 146_373);
    }

    #[test]
    fn circle_after_first_turns() {
        let mut game = MarbleGame::new();
        assert_eq!(game.marbles(), vec![0]);
        assert_eq!(game.current_marble(), Some(0));
        for marble in 1..=22 {
            assert_eq!(game.take_turn(marble), 0);
        }
        assert_eq!(
            from_zero(&game),
            vec![0, 16, 8, 17, 4, 18, 9, 19, 2, 20, 10, 21, 5, 22, 11, 1, 12, 6, 13, 3, 14, 7, 15]
        );
        assert_eq!(game.current_marble(), Some(22));

        assert_eq!(game.take_turn(23), 32);
        assert_eq!(
            from_zero(&game),
            vec![0, 16, 8, 17, 4, 18, 19, 2, 20, 10, 21, 5, 22, 11, 1, 12, 6, 13, 3, 14, 7, 15]
        );
        assert_eq!(game.current_marble(), Some(19));
        assert_eq!(game.len(), 22);
    }

    #[test]
    fn scoring_on_tiny_circle() {
        let mut game = MarbleGame::new();
        assert_eq!(game.take_turn(23), 23);
        assert!(game.is_empty());
        assert_eq!(game.current_marble(), None);
        assert_eq!(game.take_turn(24), 0);
        assert_eq!(game.marbles(), vec![24]);
        assert_eq!(game.current_marble(), Some(24));
    }

    #[test]
    fn zero_never_scores() {
        let mut game = MarbleGame::new();
        assert_eq!(game.take_turn(0), 0);
        assert_eq!(game.len(), 2);
    }

    #[test]
    fn parse_setup() {
        let setup: Setup = "10 players; last marble is worth 1618 points".parse().unwrap();
        assert_eq!(setup, Setup::new(10, 1618).unwrap());
        assert_eq!(setup.players(), 10);
        assert_eq!(setup.last_marble(), 1618);
        assert_eq!(setup.scaled(100).last_marble(), 161_800);

        let setup: Setup = "9 players; last marble is worth 25 points\n".parse().unwrap();
        assert_eq!(setup, Setup::new(9, 25).unwrap());
    }

    #[test]
    fn parse_setup_errors() {
        assert_eq!(
            "9 players; last marble is 25".parse::<Setup>(),
            Err(ParseError::Syntax("9 players; last marble is 25".to_owned()))
        );
        assert_eq!(
            "0 players; last marble is worth 25 points".parse::<Setup>(),
            Err(ParseError::NoPlayers)
        );
        assert!(matches!(
            "9 players; last marble is worth 99999999999999999999999 points".parse::<Setup>(),
            Err(ParseError::Number(_))
        ));
    }
}
