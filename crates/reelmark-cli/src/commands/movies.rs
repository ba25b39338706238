use super::progress::while_loading;
use crate::format::{format_date, format_money, format_rating, format_runtime, truncate};
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use reelmark_core::AppContext;
use reelmark_models::{AllMovieDetail, Movie};
use reelmark_sources::{find_trailer, youtube_url, ImageFallback, ImageSize};
use serde_json::json;

const TOP_CAST: usize = 8;

/// Load `pages` pages starting at `page`, stopping early when the listing runs out.
pub async fn run_list(ctx: &AppContext, query: Option<&str>, page: u32, pages: u32, output: &Output) -> Result<()> {
    let first = page.max(1);
    let last = first.saturating_add(pages.max(1) - 1);
    let label = match query {
        Some(q) if !q.is_empty() => format!("Searching '{}'", q),
        _ => "Loading popular movies".to_string(),
    };

    // Saved state is only decoration here; a broken store should not block browsing
    if let Err(e) = ctx.watchlist.hydrate().await {
        tracing::warn!("Watchlist unavailable: {}", e);
    }

    let mut movies: Vec<Movie> = Vec::new();
    let mut current = first;
    let mut has_more = false;

    loop {
        let state = while_loading(
            output,
            ctx.movie_list.subscribe(),
            |s| s.is_loading,
            &format!("{} (page {})...", label, current),
            ctx.movie_list.load(current, query),
        )
        .await;

        if state.error.is_some() {
            show_toast(ctx, output);
            if movies.is_empty() {
                return Err(eyre!("No movies loaded"));
            }
            break;
        }

        movies.extend(state.data);
        has_more = state.has_more;
        if !has_more || current >= last {
            break;
        }
        current += 1;
    }

    tracing::info!("Listed {} movies (pages {}-{})", movies.len(), first, current);

    if output.is_human() {
        if movies.is_empty() {
            output.info("No movies found");
            return Ok(());
        }
        output.table(movie_table(ctx, &movies));
        if has_more {
            output.info(format!("More results available: --page {}", current + 1).dimmed().to_string());
        }
    } else {
        output.json(&json!({
            "query": query,
            "first_page": first,
            "last_page": current,
            "has_more": has_more,
            "movies": movies,
        }));
    }

    Ok(())
}

pub async fn run_show(ctx: &AppContext, id: u64, output: &Output) -> Result<()> {
    if let Err(e) = ctx.watchlist.hydrate().await {
        tracing::warn!("Watchlist unavailable: {}", e);
    }

    let detail = load_detail(ctx, id, output).await?;
    let trailer = find_trailer(&detail.videos).map(|v| youtube_url(&v.key));
    let poster = ctx.image_url(detail.movie.movie.poster_path.as_deref(), ImageSize::W500, ImageFallback::Placeholder);
    let backdrop = ctx.image_url(detail.movie.movie.backdrop_path.as_deref(), ImageSize::W1280, ImageFallback::Empty);
    let saved = ctx.watchlist.contains(id);

    if output.is_human() {
        print_detail(&detail, trailer.as_deref(), &poster, saved);
    } else {
        output.json(&json!({
            "movie": detail.movie,
            "credits": detail.credits,
            "videos": detail.videos,
            "trailer_url": trailer,
            "poster_url": poster,
            "backdrop_url": backdrop,
            "in_watchlist": saved,
        }));
    }

    Ok(())
}

/// Fetch detail for `id`, printing the failure toast when it does not load
pub async fn load_detail(ctx: &AppContext, id: u64, output: &Output) -> Result<AllMovieDetail> {
    let state = while_loading(
        output,
        ctx.movie_detail.subscribe(),
        |s| s.is_loading,
        &format!("Loading movie {}...", id),
        ctx.movie_detail.load(id),
    )
    .await;

    match state.data {
        Some(detail) => Ok(detail),
        None => {
            show_toast(ctx, output);
            Err(eyre!("Could not load movie {}", id))
        }
    }
}

/// Print the toast currently showing, if any
pub fn show_toast(ctx: &AppContext, output: &Output) {
    if let Some(toast) = ctx.toasts.current() {
        output.toast(&toast);
    }
}

pub fn movie_table(ctx: &AppContext, movies: &[Movie]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("ID").add_attribute(Attribute::Bold),
        Cell::new("Title").add_attribute(Attribute::Bold),
        Cell::new("Released").add_attribute(Attribute::Bold),
        Cell::new("Rating").add_attribute(Attribute::Bold),
        Cell::new("Popularity").add_attribute(Attribute::Bold),
        Cell::new("Saved").add_attribute(Attribute::Bold),
    ]);

    for movie in movies {
        let saved = if ctx.watchlist.contains(movie.id) { "✓".green().to_string() } else { String::new() };
        table.add_row(vec![
            Cell::new(movie.id),
            Cell::new(truncate(&movie.title, 48)),
            Cell::new(format_date(&movie.release_date).unwrap_or_else(|| "-".to_string())),
            Cell::new(format!("{:.1}", movie.vote_average)),
            Cell::new(format!("{:.1}", movie.popularity)),
            Cell::new(saved),
        ]);
    }

    table
}

fn print_detail(detail: &AllMovieDetail, trailer: Option<&str>, poster: &str, saved: bool) {
    let info = &detail.movie;
    let movie = &info.movie;

    let heading = match movie.release_year() {
        Some(year) => format!("{} ({})", movie.title, year),
        None => movie.title.clone(),
    };
    println!("\n{}", heading.bright_cyan().bold());
    if !movie.original_title.is_empty() && movie.original_title != movie.title {
        println!("{}", movie.original_title.bright_black());
    }
    if !info.tagline.is_empty() {
        println!("{}", info.tagline.italic());
    }
    println!();

    let mut table = Table::new();
    let mut row = |label: &str, value: String| {
        table.add_row(vec![Cell::new(label).fg(Color::Cyan), Cell::new(value)]);
    };

    row("Rating", format_rating(movie.vote_average, movie.vote_count));
    row("Released", format_date(&movie.release_date).unwrap_or_else(|| "Unknown".to_string()));
    row("Runtime", format_runtime(info.runtime));
    row("Status", info.status.clone());
    if !info.genres.is_empty() {
        row("Genres", info.genres.iter().map(|g| g.name.as_str()).collect::<Vec<_>>().join(", "));
    }
    let directors: Vec<&str> = detail.credits.crew_with_job("Director").map(|c| c.name.as_str()).collect();
    if !directors.is_empty() {
        row("Director", directors.join(", "));
    }
    if !info.spoken_languages.is_empty() {
        row(
            "Languages",
            info.spoken_languages.iter().map(|l| l.english_name.as_str()).collect::<Vec<_>>().join(", "),
        );
    }
    if let Some(budget) = format_money(info.budget) {
        row("Budget", budget);
    }
    if let Some(revenue) = format_money(info.revenue) {
        row("Revenue", revenue);
    }
    if !info.homepage.is_empty() {
        row("Homepage", info.homepage.clone());
    }
    row("Trailer", trailer.unwrap_or("-").to_string());
    row("Poster", poster.to_string());
    row("Watchlist", if saved { "✓ saved".green().to_string() } else { "✗ not saved".red().to_string() });

    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    println!("{}", table);

    if !movie.overview.is_empty() {
        println!("\n{}", movie.overview);
    }

    if !detail.credits.cast.is_empty() {
        println!("\n{}", "Cast".bright_cyan().bold());
        for member in detail.credits.cast.iter().take(TOP_CAST) {
            if member.character.is_empty() {
                println!("  {}", member.name);
            } else {
                println!("  {} {} {}", member.name, "as".bright_black(), member.character);
            }
        }
    }
    println!();
}
