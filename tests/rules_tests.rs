use chessgrid::{
    coordinates::Square,
    notation::{parse_coordinate_notation, NotationError},
    perft::{perft, PerftError},
    piece::{Color, Piece, PieceType},
    position::{Position, PositionBuilder, PositionError},
    r#move::{Move, MoveError},
};
use colored::*;
use serde::Deserialize;
use std::{
    collections::{BTreeMap, BTreeSet},
    fs::File,
    io::BufReader,
    path::PathBuf,
    time::Instant,
};
use thiserror::Error;

const EXIT_FAILURE: i32 = 1;

//======================================================================================================================
// Error handling
//======================================================================================================================

/// Errors that are related to the test harness.
#[derive(Error, Debug)]
enum TestHarnessError {
    #[error("The current directory cannot be read")]
    CurrentDirNotFound,

    #[error("Resource path not found: {0:?}")]
    ResourcePathNotFound(PathBuf),

    #[error("Cannot read the test data file ({0:?})")]
    CannotReadTestDataFile(PathBuf),

    #[error("Cannot parse the test data file: {0}")]
    CannotParseTestDataFile(#[from] serde_json::Error),
}

/// Errors that are related to the test data.
#[derive(Error, Debug)]
enum TestDataError {
    #[error("Cannot parse \"{0}\" as a square")]
    CannotParseSquare(String),

    #[error("Cannot parse \"{0}\" as a piece")]
    CannotParsePiece(String),

    #[error("Cannot parse \"{0}\" as a color")]
    CannotParseColor(String),

    #[error("Cannot parse the move \"{0}\": {1}")]
    CannotParseMove(String, NotationError),

    #[error("The pieces do not describe a valid position: {0}")]
    InvalidPosition(#[from] PositionError),
}

/// Errors used when tests fail.
#[derive(Error, Debug)]
enum TestFailureError {
    #[error("Unexpected status for {play}\n\nExpected: {expected}\n\nActual: {actual}")]
    UnexpectedStatus { play: String, expected: String, actual: String },

    #[error("Unexpected token for {play}\n\nExpected: {expected}\n\nActual: {actual}")]
    UnexpectedToken { play: String, expected: String, actual: String },

    #[error("Unexpected position after undoing {play}\n\nOriginal:\n{original}\n\nActual:\n{actual}")]
    UnexpectedPositionAfterUndo { play: String, original: String, actual: String },

    #[error("Unexpected destinations from {square}\n\nExpected: {expected:?}\n\nActual: {actual:?}")]
    UnexpectedDestinations { square: String, expected: BTreeSet<String>, actual: BTreeSet<String> },

    #[error("Unexpected tile on {square}\n\nExpected: {expected}\n\nActual: {actual}\n\nPosition:\n{position}")]
    UnexpectedTile { square: String, expected: String, actual: String, position: String },

    #[error("Unexpected {property}\n\nExpected: {expected}\n\nActual: {actual}\n\nPosition:\n{position}")]
    UnexpectedProperty { property: &'static str, expected: String, actual: String, position: String },

    #[error("Error while applying a move: {0}")]
    MoveError(#[from] MoveError),

    #[error("Error while counting the moves: {0}")]
    PerftError(#[from] PerftError),
}

/// Global errors for this module.
#[derive(Error, Debug)]
enum RulesTestError {
    #[error("Test harness error: {}", .0)]
    TestHarnessError(#[from] TestHarnessError),

    #[error("Test data parsing error: {}", .0)]
    TestDataParsingError(#[from] TestDataError),

    #[error("---- {} ----\n{}", .test_name, .test_failure_error)]
    TestFailed { test_name: String, test_failure_error: TestFailureError },
}

//======================================================================================================================
// Test data structures
//======================================================================================================================

/// A test case: a starting position, moves to attempt and what the final position must look like.
#[derive(Debug, Deserialize)]
struct Test {
    description: String,
    /// Pieces of the starting position (e.g. "Ke1", "pe7"), the standard position when absent. A trailing `*` marks
    /// a piece that has already moved.
    pieces: Option<Vec<String>>,
    turn: Option<String>,
    #[serde(default)]
    moves: Vec<TestMove>,
    expected: Expected,
}

/// A move to attempt, in coordinate notation.
#[derive(Debug, Deserialize)]
struct TestMove {
    play: String,
    status: String,
    token: Option<String>,
}

/// The expected state of the final position, every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Expected {
    legal_moves: Option<u64>,
    in_check: Option<bool>,
    in_checkmate: Option<bool>,
    in_stalemate: Option<bool>,
    /// Destinations of the pieces of the side to move, read from its moves. Pieces of the other side have none.
    destinations: BTreeMap<String, Vec<String>>,
    squares: BTreeMap<String, String>,
}

//======================================================================================================================
// Test data reading and parsing
//======================================================================================================================

fn parse_square(value: &str) -> Result<Square, TestDataError> {
    Square::try_from(value).map_err(|_| TestDataError::CannotParseSquare(value.to_string()))
}

fn parse_piece(value: &str) -> Result<Piece, TestDataError> {
    let error = || TestDataError::CannotParsePiece(value.to_string());

    let (description, moved) = match value.strip_suffix('*') {
        Some(description) => (description, true),
        None => (value, false),
    };
    let letter = description.chars().next().ok_or_else(error)?;
    let piece_type = PieceType::try_from(letter).map_err(|_| error())?;
    let color = if letter.is_ascii_uppercase() { Color::White } else { Color::Black };
    let square = parse_square(description.get(1..).ok_or_else(error)?)?;

    let piece = Piece::new(color, piece_type, square);
    Ok(if moved { piece.moved() } else { piece })
}

fn parse_color(value: &str) -> Result<Color, TestDataError> {
    match value {
        "white" => Ok(Color::White),
        "black" => Ok(Color::Black),
        _ => Err(TestDataError::CannotParseColor(value.to_string())),
    }
}

fn initial_position(test: &Test) -> Result<Position, TestDataError> {
    let Some(pieces) = &test.pieces else {
        return Ok(Position::standard());
    };

    let mut builder = PositionBuilder::new();
    for piece in pieces {
        builder.set_piece(parse_piece(piece)?);
    }
    if let Some(turn) = &test.turn {
        builder.turn(parse_color(turn)?);
    }
    Ok(builder.build()?)
}

/// Read the tests data from the file.
fn read_tests_data() -> Result<Vec<Test>, RulesTestError> {
    let tests_file_path = get_resource_path("assets/tests/rules_tests.json")?;
    let file = File::open(&tests_file_path).map_err(|_| TestHarnessError::CannotReadTestDataFile(tests_file_path))?;
    let reader = BufReader::new(file);
    let tests: Vec<Test> = serde_json::from_reader(reader).map_err(TestHarnessError::CannotParseTestDataFile)?;
    Ok(tests)
}

//======================================================================================================================
// Test harness
//======================================================================================================================

fn tile_string(position: &Position, square: Square) -> String {
    position.tile(square).to_string()
}

fn same_tiles(a: &Position, b: &Position) -> bool {
    Square::all().all(|square| a.tile(square) == b.tile(square))
}

/// Plays the moves of the test, checking the status and token of each one, and returns the final position.
fn test_moves(test: &Test, mut position: Position) -> Result<Position, RulesTestError> {
    let failed = |test_failure_error| RulesTestError::TestFailed {
        test_name: test.description.clone(),
        test_failure_error,
    };

    for test_move in test.moves.iter() {
        let (from, to) = parse_coordinate_notation(&test_move.play)
            .map_err(|e| TestDataError::CannotParseMove(test_move.play.clone(), e))?;

        let transition = chessgrid::attempt_move(&position, from, to).map_err(|e| failed(e.into()))?;
        let actual = format!("{:?}", transition.status());
        if actual != test_move.status {
            return Err(failed(TestFailureError::UnexpectedStatus {
                play: test_move.play.clone(),
                expected: test_move.status.clone(),
                actual,
            }));
        }

        if let Some(expected) = &test_move.token {
            let actual = chessgrid::render_token(&transition.transition_move());
            if *expected != actual {
                return Err(failed(TestFailureError::UnexpectedToken {
                    play: test_move.play.clone(),
                    expected: expected.clone(),
                    actual,
                }));
            }
        }

        if transition.status().is_done() {
            let mv: Move = transition.transition_move();
            let undone = mv.undo(transition.position()).map_err(|e| failed(e.into()))?;
            if !same_tiles(&undone, &position) || undone.side_to_move() != position.side_to_move() {
                return Err(failed(TestFailureError::UnexpectedPositionAfterUndo {
                    play: test_move.play.clone(),
                    original: position.to_string(),
                    actual: undone.to_string(),
                }));
            }
        }

        position = transition.into_position();
    }

    Ok(position)
}

/// Checks the final position of a test against its expectations.
fn test_expectations(test: &Test, position: &Position) -> Result<(), RulesTestError> {
    let failed = |test_failure_error| RulesTestError::TestFailed {
        test_name: test.description.clone(),
        test_failure_error,
    };
    let expected = &test.expected;
    let player = position.current_player();

    let property = |property: &'static str, expected: Option<String>, actual: String| match expected {
        Some(expected) if expected != actual => Err(failed(TestFailureError::UnexpectedProperty {
            property,
            expected,
            actual,
            position: position.to_string(),
        })),
        _ => Ok(()),
    };

    let legal_moves = perft(position, 1, 1).map_err(|e| failed(e.into()))?;
    property("legal move count", expected.legal_moves.map(|n| n.to_string()), legal_moves.to_string())?;
    property("check status", expected.in_check.map(|b| b.to_string()), player.in_check().to_string())?;

    let checkmate = player.in_checkmate().map_err(|e| failed(e.into()))?;
    property("checkmate status", expected.in_checkmate.map(|b| b.to_string()), checkmate.to_string())?;
    let stalemate = player.in_stalemate().map_err(|e| failed(e.into()))?;
    property("stalemate status", expected.in_stalemate.map(|b| b.to_string()), stalemate.to_string())?;

    for (square, destinations) in expected.destinations.iter() {
        let from = parse_square(square)?;
        let expected: BTreeSet<String> = destinations.iter().cloned().collect();
        let actual: BTreeSet<String> = chessgrid::current_legal_moves(position)
            .iter()
            .filter(|mv| mv.from_square() == Some(from))
            .filter_map(|mv| mv.to_square())
            .map(|to| to.to_string())
            .collect();
        if expected != actual {
            return Err(failed(TestFailureError::UnexpectedDestinations { square: square.clone(), expected, actual }));
        }
    }

    for (square, tile) in expected.squares.iter() {
        let actual = tile_string(position, parse_square(square)?);
        if *tile != actual {
            return Err(failed(TestFailureError::UnexpectedTile {
                square: square.clone(),
                expected: tile.clone(),
                actual,
                position: position.to_string(),
            }));
        }
    }

    Ok(())
}

/// Run a single test case.
fn run_test(test: Test) -> Result<(), RulesTestError> {
    let position = initial_position(&test)?;
    let position = test_moves(&test, position)?;
    test_expectations(&test, &position)?;
    Ok(())
}

/// Run all the tests and return the number of failures.
fn run_tests() -> Result<usize, RulesTestError> {
    let tests = read_tests_data()?;

    println!("\nrunning {} tests", tests.len());

    let start = Instant::now();
    let mut passed = 0;
    let mut failed = 0;
    let mut failures: Vec<RulesTestError> = Vec::new();
    for test in tests {
        print!("test {} ...", test.description);
        let result_string = match run_test(test) {
            Ok(_) => {
                passed += 1;
                "ok".green()
            }

            Err(error) => {
                failed += 1;
                failures.push(error);
                "FAILED".red()
            }
        };
        println!(" {}", result_string);
    }
    let seconds = start.elapsed().as_secs_f32();

    for failure in failures {
        println!("\n{}", failure)
    }

    println!(
        "\ntest result: {}. {} passed; {} failed; finished in {:.2}s\n",
        if failed == 0 { "ok".green() } else { "FAILED".red() },
        passed,
        failed,
        seconds
    );

    Ok(failed)
}

//======================================================================================================================
// Main function and helpers
//======================================================================================================================

/// Get the path to a resource file.
fn get_resource_path(relative_path: &str) -> Result<PathBuf, TestHarnessError> {
    let mut path = std::env::current_dir().map_err(|_| TestHarnessError::CurrentDirNotFound)?;
    path.push(relative_path);

    if !path.exists() {
        return Err(TestHarnessError::ResourcePathNotFound(path));
    }

    Ok(path)
}

/// The main function for the test harness. It will run the tests and print any unexpected errors.
fn main() {
    match run_tests() {
        Ok(0) => {}
        Ok(_) => std::process::exit(EXIT_FAILURE),
        Err(error) => {
            eprintln!("{}", error);
            std::process::exit(EXIT_FAILURE)
        }
    }
}
