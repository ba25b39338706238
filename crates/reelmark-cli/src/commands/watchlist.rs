use super::movies::{load_detail, movie_table};
use crate::output::Output;
use crate::WatchlistCommands;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use reelmark_core::{order_list, AppContext};
use serde_json::json;

pub async fn run_watchlist(ctx: &AppContext, cmd: WatchlistCommands, output: &Output) -> Result<()> {
    // Editing on top of an unreadable file would overwrite it, so hydration errors are fatal here
    let count = ctx
        .watchlist
        .hydrate()
        .await
        .wrap_err("Failed to read the stored watchlist")?;
    tracing::debug!("Watchlist hydrated with {} movies", count);

    match cmd {
        WatchlistCommands::List { order, direction } => {
            let movies = match order {
                Some(key) => order_list(&ctx.watchlist.list(), key, direction),
                None => ctx.watchlist.list(),
            };

            if output.is_human() {
                if movies.is_empty() {
                    output.info("Your watchlist is empty. Add movies with 'reelmark watchlist add <id>'.");
                } else {
                    output.table(movie_table(ctx, &movies));
                    output.info(format!("{} movies saved", movies.len()));
                }
            } else {
                output.json(&json!({ "count": movies.len(), "movies": movies }));
            }
            Ok(())
        }
        WatchlistCommands::Add { id } => {
            if let Some(existing) = ctx.watchlist.get(id) {
                output.info(format!("'{}' is already in your watchlist", existing.title));
                return Ok(());
            }
            let detail = load_detail(ctx, id, output).await?;
            let title = detail.movie.movie.title.clone();
            ctx.watchlist.add(detail.movie.movie).wrap_err("Failed to save watchlist")?;
            output.success(format!("Added '{}' to your watchlist", title));
            Ok(())
        }
        WatchlistCommands::Remove { id } => {
            let removed = ctx.watchlist.remove(id).wrap_err("Failed to save watchlist")?;
            if removed == 0 {
                output.warn(format!("Movie {} is not in your watchlist", id));
            } else {
                output.success(format!("Removed movie {} from your watchlist", id));
            }
            Ok(())
        }
        WatchlistCommands::Toggle { id } => {
            let movie = match ctx.watchlist.get(id) {
                Some(movie) => movie,
                None => load_detail(ctx, id, output).await?.movie.movie,
            };
            let title = movie.title.clone();
            let saved = ctx.watchlist.toggle(movie).wrap_err("Failed to save watchlist")?;
            if saved {
                output.success(format!("Added '{}' to your watchlist", title));
            } else {
                output.success(format!("Removed '{}' from your watchlist", title));
            }
            Ok(())
        }
        WatchlistCommands::Order { key, direction } => {
            ctx.watchlist.order_by(key, direction).wrap_err("Failed to save watchlist")?;
            output.success(format!("Watchlist ordered by {} ({})", key, direction));
            Ok(())
        }
    }
}
