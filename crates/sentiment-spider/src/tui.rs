use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// One tick per harvested day; hidden unless `tui` is set.
pub(crate) fn day_progress(len: usize, tui: bool) -> anyhow::Result<ProgressBar> {
    if !tui {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new(len as u64).with_style(
        ProgressStyle::default_bar()
            .template(
                "{msg} {spinner:.magenta}\n\
                [{elapsed_precise:.magenta}] |{bar:40.cyan/blue}| {human_pos}/{human_len} days \
                [Rate: {per_sec:.magenta}, ETA: {eta:.blue}]",
            )?
            .progress_chars("##-"),
    );
    pb.set_message("harvesting sentiment ...");
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}
