use std::thread;

use thiserror::Error;
use tracing::debug;

use crate::{
    position::Position,
    r#move::{Move, MoveError},
};

/// Represents errors that can occur during perft (performance test) operations.
///
/// # Variants
/// * `MoveError(MoveError)` - A move of the tree could not be executed
/// * `WorkerPanicked` - One of the worker threads of a parallel perft panicked
#[derive(Error, Debug)]
pub enum PerftError {
    #[error("Unable to execute a move: {0}")]
    MoveError(#[from] MoveError),

    #[error("A perft worker thread panicked")]
    WorkerPanicked,
}

/// Returns the moves of the side to move that can be done, with the position each one leads to.
///
/// # Errors
/// * `MoveError` - If one of the moves cannot be executed
fn children(position: &Position) -> Result<Vec<(Move, Position)>, MoveError> {
    let player = position.current_player();
    let mut children = Vec::with_capacity(player.legal_moves().len());

    for mv in player.legal_moves() {
        let transition = player.make_move(mv)?;
        if transition.status().is_done() {
            children.push((*mv, transition.into_position()));
        }
    }

    Ok(children)
}

/// Recursively counts the leaf nodes of the move tree at a specified depth.
///
/// # Parameters
/// * `position` - The position to analyze
/// * `depth` - The remaining depth to traverse in the move tree
///
/// # Returns
/// * The number of positions reached at the specified depth
fn recursive_perft(position: &Position, depth: u32) -> Result<u64, MoveError> {
    if depth == 0 {
        return Ok(1);
    }

    let children = children(position)?;
    if depth == 1 {
        return Ok(children.len() as u64);
    }

    children.iter().map(|(_, child)| recursive_perft(child, depth - 1)).sum()
}

/// Counts the leaf nodes of the tree of legal moves from a position.
///
/// Perft tests count the number of positions reachable by a sequence of `depth` legal moves. They validate the move
/// generator by comparing the counts with known values.
///
/// # Parameters
/// * `position` - The position to analyze
/// * `depth` - The depth of the move tree to traverse
/// * `threads` - Number of threads to use. The moves of the root position are split between them.
///
/// # Returns
/// * `Ok(u64)` - The number of leaf nodes
///
/// # Errors
/// * `PerftError::MoveError` - If a move of the tree cannot be executed
/// * `PerftError::WorkerPanicked` - If a worker thread panicked
pub fn perft(position: &Position, depth: u32, threads: usize) -> Result<u64, PerftError> {
    if threads <= 1 || depth <= 1 {
        return Ok(recursive_perft(position, depth)?);
    }

    let children = children(position)?;
    let chunk_size = children.len().div_ceil(threads).max(1);
    debug!("Running perft({}) on {} root moves with {} threads", depth, children.len(), threads);

    thread::scope(|scope| {
        let handles: Vec<_> = children
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    chunk.iter().map(|(_, child)| recursive_perft(child, depth - 1)).sum::<Result<u64, MoveError>>()
                })
            })
            .collect();

        handles.into_iter().try_fold(0u64, |total, handle| -> Result<u64, PerftError> {
            let nodes = handle.join().map_err(|_| PerftError::WorkerPanicked)??;
            Ok(total + nodes)
        })
    })
}

/// Generates a detailed "divide" view of the perft results.
///
/// The result holds each move of the side to move that can be done and the number of leaf nodes found beneath it, in
/// the order of their tokens.
///
/// # Parameters
/// * `position` - The position to analyze
/// * `depth` - The depth of the move tree to traverse, at least 1
///
/// # Errors
/// * `PerftError::MoveError` - If a move of the tree cannot be executed
pub fn divide(position: &Position, depth: u32) -> Result<Vec<(Move, u64)>, PerftError> {
    let mut results = children(position)?
        .iter()
        .map(|(mv, child)| -> Result<(Move, u64), MoveError> {
            Ok((*mv, recursive_perft(child, depth.saturating_sub(1))?))
        })
        .collect::<Result<Vec<_>, MoveError>>()?;

    results.sort_by_key(|(mv, _)| mv.to_string());
    Ok(results)
}
