//! Prioritised, nested and cooperative task execution
//!
//! Run with `RUST_LOG=depth_pool=trace cargo run --example priority_tasks`.

use depth_pool::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_thread_names(true)
        .init();

    println!("=== Priority Tasks Example ===\n");

    let config = Config::builder()
        .num_threads(2)
        .max_recursion_depth(3)
        .thread_name_prefix("demo")
        .build()?;
    let pool = Arc::new(ThreadPool::new(config)?);

    // Occupy both workers briefly so the queue builds up.
    let blockers: Vec<_> = (0..2)
        .map(|_| pool.add_task(|| thread::sleep(Duration::from_millis(50))))
        .collect();

    println!("Queueing tasks with different priorities...");
    let handles: Vec<_> = [(-5, "background"), (0, "normal"), (10, "urgent"), (0, "normal-2")]
        .into_iter()
        .map(|(priority, name)| {
            pool.add_task_with_priority(priority, move || {
                println!("  [{:>3}] {} running", priority, name);
                name
            })
        })
        .collect();

    for handle in blockers {
        pool.wait_for_task(handle)?;
    }
    for handle in handles {
        pool.wait_for_task(handle)?;
    }

    println!("\nNested submission (depth limit 3):");
    let inner = pool.clone();
    let nested = pool.add_task(move || sum_to(&inner, 10));
    println!("  sum 1..=10 = {}", pool.wait_for_task(nested)?);

    println!("\nPanicking task:");
    let failing = pool.add_task(|| -> u32 { panic!("something went wrong") });
    match pool.wait_for_task(failing) {
        Err(Error::TaskPanicked(info)) => println!("  caught: {}", info),
        other => println!("  unexpected: {:?}", other),
    }

    println!("\nStats: {:?}", pool.stats());

    pool.shutdown();
    let late = pool.add_task(|| 1);
    println!("Submission after shutdown: {:?}", pool.wait_for_task(late));

    println!("\n=== Example Complete ===");
    Ok(())
}

fn sum_to(pool: &Arc<ThreadPool>, n: u64) -> u64 {
    if n == 0 {
        return 0;
    }
    let inner = pool.clone();
    let rest = pool.add_task(move || sum_to(&inner, n - 1));
    if rest.was_inlined() {
        println!("  n={} ran inline at depth {}", n - 1, current_depth());
    }
    n + pool.wait_for_task(rest).unwrap_or_default()
}
