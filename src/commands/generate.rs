//! Generate static files

use anyhow::Result;

use crate::generator::Generator;
use crate::Blog;

/// Generate the static site
pub fn run(blog: &Blog) -> Result<()> {
    let start = std::time::Instant::now();

    let loader = blog.loader()?;
    let generator = Generator::new(blog)?;
    let stats = generator.generate(&loader)?;

    tracing::info!(
        "Generated {} posts, {} members, {} tags and copied {} assets into {:?}",
        stats.posts,
        stats.members,
        stats.tags,
        stats.assets,
        blog.public_dir
    );

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}
