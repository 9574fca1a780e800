use std::error::Error;
use std::io::BufRead;

use clap::{Parser, Subcommand};
use marble_mania::paged_seq::{DEFAULT_MAX_PAGE_SIZE, DEFAULT_MIN_LOAD_SIZE};
use marble_mania::{play, Marble, PageConfig, Setup};
use tracing_subscriber::EnvFilter;

// Part 2 plays the same game with a last marble this many times larger.
const PART2_FACTOR: Marble = 100;

#[derive(Parser, Debug)]
#[command(name = "day9", about = "Marble mania: winning score for the game described on stdin")]
struct Cli {
    #[command(subcommand)]
    part: Part,
    /// Split a page of the circle once it holds more marbles than this.
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_PAGE_SIZE)]
    max_page_size: usize,
    /// Merge a page of the circle once it holds fewer marbles than this.
    #[arg(long, global = true, default_value_t = DEFAULT_MIN_LOAD_SIZE)]
    min_load_size: usize,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Part {
    /// Winning score for the game as given.
    Part1,
    /// Winning score with the last marble worth 100 times more.
    Part2,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = PageConfig::new(cli.max_page_size, cli.min_load_size)?;
    let stdin = std::io::stdin().lock();
    match cli.part {
        Part::Part1 => println!("{}", part1(stdin, config)?),
        Part::Part2 => println!("{}", part2(stdin, config)?),
    }
    Ok(())
}

fn part1(r: impl BufRead, config: PageConfig) -> Result<Marble, Box<dyn Error>> {
    let setup = read_setup(r)?;
    Ok(play(&setup, config))
}

fn part2(r: impl BufRead, config: PageConfig) -> Result<Marble, Box<dyn Error>> {
    let setup = read_setup(r)?;
    Ok(play(&setup.scaled(PART2_FACTOR), config))
}

fn read_setup(r: impl BufRead) -> Result<Setup, Box<dyn Error>> {
    let line = r.lines().next().ok_or("empty input")??;
    Ok(line.parse::<Setup>()?)
}
