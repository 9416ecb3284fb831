//! Render a board position to SVG.
//!
//! Usage: `goban [POSITION.json] [-o OUTPUT.svg] [--ghost X,Y]`
//!
//! Without a position file an empty default board is rendered. `--ghost`
//! previews a translucent stone of the color to play next.

mod position;

use clap::Parser;
use goban_core::board::BoardError;
use goban_core::objects::{BoardObject, Color};
use goban_render::{Board, SvgBoard};
use position::Position;
use std::path::PathBuf;
use thiserror::Error;

const GHOST_OPACITY: f64 = 0.35;

#[derive(Debug, Error)]
enum CliError {
    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("Failed to write {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },
    #[error("Invalid position file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Board(#[from] BoardError),
}

#[derive(Parser, Debug)]
#[command(name = "goban", version, about = "Render a board position to SVG")]
struct Args {
    /// Position file (JSON). An empty default board when omitted.
    input: Option<PathBuf>,

    /// Output SVG path. Writes to stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Preview a translucent stone of the next color at `X,Y`.
    #[arg(long, value_name = "X,Y", value_parser = parse_point)]
    ghost: Option<(u32, u32)>,
}

fn parse_point(text: &str) -> Result<(u32, u32), String> {
    let invalid = || format!("expected X,Y but got {}", text);
    let (x, y) = text.split_once(',').ok_or_else(invalid)?;
    let x = x.trim().parse().map_err(|_| invalid())?;
    let y = y.trim().parse().map_err(|_| invalid())?;
    Ok((x, y))
}

fn load_position(input: Option<&PathBuf>) -> Result<Position, CliError> {
    let Some(path) = input else {
        return Ok(Position::default());
    };
    let json = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.clone(),
        source,
    })?;
    Ok(Position::from_json(&json)?)
}

fn render(position: &Position, ghost: Option<(u32, u32)>) -> Result<String, CliError> {
    let mut board = SvgBoard::new(position.config.clone())?;
    for spec in &position.objects {
        board.add_object(spec.to_object()?)?;
    }
    log::info!("placed {} objects on a {}x{} board", board.base().len(), board.base().size(), board.base().size());

    if let Some((x, y)) = ghost {
        let next = next_color(position);
        let id = board.add_object(BoardObject::stone(next, 0, 0).with_opacity(GHOST_OPACITY))?;
        board.edit_object(id, |stone| stone.set_position(x, y))?;
    }
    Ok(board.to_svg_string())
}

/// Color to play after the stones of `position`.
fn next_color(position: &Position) -> Color {
    let last = position
        .objects
        .iter()
        .rev()
        .find_map(|spec| match spec.kind.as_str() {
            "B" => Some(Color::Black),
            "W" => Some(Color::White),
            _ => None,
        });
    last.map(Color::opposite).unwrap_or(Color::Black)
}

fn run() -> Result<(), CliError> {
    let args = Args::parse();
    let position = load_position(args.input.as_ref())?;
    let svg = render(&position, args.ghost)?;

    match &args.output {
        Some(path) => std::fs::write(path, svg).map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        })?,
        None => println!("{}", svg),
    }
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        log::error!("{}", err);
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("goban").chain(list.iter().copied()))
    }

    #[test]
    fn test_parse_args() {
        let parsed = args(&["game.json", "-o", "out.svg", "--ghost", "3, 4"]).unwrap();
        assert_eq!(parsed.input, Some(PathBuf::from("game.json")));
        assert_eq!(parsed.output, Some(PathBuf::from("out.svg")));
        assert_eq!(parsed.ghost, Some((3, 4)));

        assert!(args(&["--ghost", "3"]).is_err());
        assert!(args(&["-o"]).is_err());
        assert!(args(&["a.json", "b.json"]).is_err());
        assert!(args(&["--verbose"]).is_err());
        assert!(args(&["--ghost", "x,4"]).is_err());

        let bare = args(&[]).unwrap();
        assert!(bare.input.is_none() && bare.output.is_none() && bare.ghost.is_none());
    }

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("0,18"), Ok((0, 18)));
        assert_eq!(parse_point(" 3 , 4 "), Ok((3, 4)));
        assert!(parse_point("3;4").is_err());
        assert!(parse_point("-1,2").is_err());
    }

    #[test]
    fn test_render_with_ghost() {
        let position = Position::from_json(r#"{ "objects": [ { "type": "B", "x": 3, "y": 3 } ] }"#).unwrap();
        assert_eq!(next_color(&position), Color::White);

        let svg = render(&position, Some((15, 15))).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("opacity=\"0.35\""));
        assert!(svg.contains("translate(15,15)"));
    }

    #[test]
    fn test_unknown_type_fails() {
        let position = Position::from_json(r#"{ "objects": [ { "type": "SMILE", "x": 1, "y": 1 } ] }"#).unwrap();
        assert!(matches!(render(&position, None), Err(CliError::Board(BoardError::NoHandler(_)))));
    }
}
