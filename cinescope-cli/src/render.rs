//! Terminal rendering for search results and the trending list.

use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};

use cinescope_core::trending::TrendingEntry;
use cinescope_core::{MovieSummary, SearchState};

/// Shown in place of a screen whose rendering panicked.
pub const CRASH_BANNER: &str = "Something went wrong while drawing the screen.";
/// Follows the crash banner.
pub const RETRY_HINT: &str = "Type a new query to try again.";

/// Writes the trending list with 1-based ranks. Writes nothing when empty.
pub fn write_trending<W: Write>(out: &mut W, entries: &[TrendingEntry]) -> io::Result<()> {
    if entries.is_empty() {
        return Ok(());
    }

    writeln!(out, "Trending Movies")?;
    for (index, entry) in entries.iter().enumerate() {
        writeln!(
            out,
            "  {:>2}. {} ({}, {} searches)",
            index + 1,
            entry.title,
            entry.search_term,
            entry.count
        )?;
    }
    writeln!(out)
}

pub fn write_movie_card<W: Write>(out: &mut W, movie: &MovieSummary) -> io::Result<()> {
    writeln!(out, "  {}", movie.title)?;
    writeln!(
        out,
        "     * {} | {} | {}",
        movie.rating_label(),
        movie.original_language.as_deref().unwrap_or("N/A"),
        movie.release_year().unwrap_or("N/A")
    )
}

/// Writes the result section: spinner text, error, or the movie cards.
pub fn write_results<W: Write>(out: &mut W, state: &SearchState) -> io::Result<()> {
    writeln!(out, "All Movies")?;

    if state.is_loading {
        return writeln!(out, "  Loading...");
    }

    if let Some(message) = &state.error_message {
        return writeln!(out, "  {message}");
    }

    if state.movies.is_empty() && state.generation > 0 {
        return writeln!(out, "  No movies found.");
    }

    for movie in &state.movies {
        write_movie_card(out, movie)?;
    }
    Ok(())
}

/// Full interactive screen: prompt line, trending list, results.
pub fn write_screen<W: Write>(
    out: &mut W,
    state: &SearchState,
    trending: &[TrendingEntry],
) -> io::Result<()> {
    writeln!(out, "Search: {}", state.query)?;
    writeln!(out)?;
    write_trending(out, trending)?;
    write_results(out, state)
}

/// Renders into a buffer and copies it to `out`, or shows the crash banner
/// if rendering panics.
///
/// Returns `false` when the banner was shown.
pub fn render_with_boundary<W, F>(out: &mut W, render: F) -> io::Result<bool>
where
    W: Write,
    F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
{
    let mut buffer = Vec::new();

    // The default hook would print the panic over the screen; log it instead.
    let previous_hook = panic::take_hook();
    panic::set_hook(Box::new(|info| {
        tracing::error!(panic = %info, "Rendering panicked");
    }));
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| render(&mut buffer)));
    panic::set_hook(previous_hook);

    match outcome {
        Ok(result) => {
            result?;
            out.write_all(&buffer)?;
            out.flush()?;
            Ok(true)
        }
        Err(_) => {
            writeln!(out, "{CRASH_BANNER}")?;
            writeln!(out, "{RETRY_HINT}")?;
            out.flush()?;
            Ok(false)
        }
    }
}
