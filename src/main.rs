//! Paged-View CLI (for testing purposes only)
//! Paginates a sample document headlessly and prints the plan.
//! The main interface is through WASM bindings.

use paged_view::{
    Block, Document, ManualHost, PaginationConfig, Paginator, SimulatedView, SurfaceStyle,
};

fn sample_document() -> Document {
    let body = "The quick brown fox jumps over the lazy dog. ".repeat(12);
    let mut blocks = vec![Block::heading(1, "Quarterly Report")];
    for section in 1..=4 {
        blocks.push(Block::heading(2, format!("Section {}", section)));
        blocks.push(Block::paragraph(body.clone()));
        blocks.push(Block::list(
            false,
            vec![
                Block::paragraph("First point"),
                Block::paragraph("Second point"),
            ],
        ));
        blocks.push(Block::table([["Metric", "Value"], ["Revenue", "42"]]));
        blocks.push(Block::image(240.0));
        blocks.push(Block::rule());
    }
    Document::from_blocks(blocks)
}

fn main() {
    let config = PaginationConfig::default();
    let view = SimulatedView::new(
        sample_document(),
        SurfaceStyle::for_geometry(&config.geometry),
    );

    let mut paginator = match Paginator::new(view, ManualHost::new(), config) {
        Ok(paginator) => paginator,
        Err(err) => {
            eprintln!("error: {}", err);
            std::process::exit(1);
        }
    };

    // drive the virtual clock until nothing is pending
    loop {
        for timer in paginator.host_mut().advance(1_000) {
            paginator.on_timer(timer);
        }
        let frames = paginator.host_mut().take_frames();
        if frames.is_empty() {
            break;
        }
        for frame in frames {
            paginator.on_frame(frame);
        }
    }

    println!("Paged-View");
    println!("==========");
    println!();
    println!("pages: {}", paginator.page_count());
    for decoration in paginator.plan().decorations(&paginator.config().geometry) {
        println!(
            "  {:<16} pos {:>5}  height {:>7.1}",
            decoration.key, decoration.pos.0, decoration.height
        );
    }

    let stats = paginator.stats();
    println!();
    println!(
        "passes: {}, commits: {}, surface height: {:.1}",
        stats.passes,
        stats.commits,
        paginator.view().height()
    );
}
