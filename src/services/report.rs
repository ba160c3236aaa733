//! Plain-text run report.
//!
//! Progress lines and the ranking are free text meant for people; the web front end shows
//! them verbatim.

use std::fmt::Write as _;
use std::io::Write;

use crate::{
    error::AppResult,
    models::{GenreId, RankedResult},
};

/// Formats the ranked list, truncated to `top_n` entries
pub fn format_ranking(target_title: &str, ranked: &[RankedResult], top_n: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "Top {} review-vibe matches to '{}':", top_n, target_title);
    let _ = writeln!(out);
    for result in ranked.iter().take(top_n) {
        let _ = writeln!(
            out,
            "[{:.3}] {}",
            result.score, result.candidate.movie.title
        );
    }
    out
}

/// Writes progress and results of one run
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) -> AppResult<()> {
        writeln!(self.out, "{}", text)?;
        self.out.flush()?;
        Ok(())
    }

    pub fn searching(&mut self, title: &str) -> AppResult<()> {
        self.line(&format!("Searching for '{}'...", title))
    }

    pub fn not_found(&mut self) -> AppResult<()> {
        self.line("Movie not found.")
    }

    pub fn no_genres(&mut self) -> AppResult<()> {
        self.line("No genres found for this movie.")
    }

    pub fn no_reviews(&mut self) -> AppResult<()> {
        self.line("No reviews found for the target movie.")
    }

    pub fn target_summary(
        &mut self,
        title: &str,
        review_count: usize,
        genre_ids: &[GenreId],
    ) -> AppResult<()> {
        self.line(&format!("Pulled {} reviews for {}", review_count, title))?;
        self.line(&format!("Using genres: {:?}", genre_ids))
    }

    pub fn pool_size(&mut self, candidates: usize) -> AppResult<()> {
        self.line(&format!(
            "Comparing with {} similar-genre movies...",
            candidates
        ))
    }

    pub fn ranking(
        &mut self,
        target_title: &str,
        ranked: &[RankedResult],
        top_n: usize,
    ) -> AppResult<()> {
        self.out
            .write_all(format_ranking(target_title, ranked, top_n).as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}
