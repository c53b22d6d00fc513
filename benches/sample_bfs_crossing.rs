use std::time::Duration;

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;
use glob::glob;
use hrsw::Stopwatch;
use human_duration::human_duration;

use crossing::algorithms::bfs::BreadthFirstSearch;
use crossing::problems::river_crossing::RiverCrossingProblem;
use crossing::problems::river_crossing::RiverCrossingSpace;

/// Maximum time willing to wait for a single benchmark instance.
/// Experiments are carried out at least 5s and at least 100 times, so running a
/// 1s instance takes 1m40s.
const MAX_INSTANCE_TIME: Duration = Duration::from_secs(1);

/// Finds the first solution and keeps searching until the Space is exhausted.
fn bfs(problem: RiverCrossingProblem) -> usize {
    let mut search = BreadthFirstSearch::new(problem);
    let mut moves = 0;
    while let Some(path) = search.find_next_goal() {
        moves += path.len();
    }
    moves
}

/// An operator and `n` passengers where neighbours can't be left together.
fn chain(n: usize, capacity: usize) -> RiverCrossingProblem {
    let mut names = vec!["Operator".to_string()];
    names.extend((0..n).map(|i| format!("P{i}")));
    let pairs: Vec<(String, String)> = (1..n)
        .map(|i| (format!("P{}", i - 1), format!("P{i}")))
        .collect();

    let space = RiverCrossingSpace::new(&names[..], "Operator", &pairs[..], capacity).unwrap();
    RiverCrossingProblem::new(space)
}

fn too_slow(name: &str, problem: &RiverCrossingProblem) -> bool {
    let mut stopwatch = Stopwatch::new_started();
    let moves = bfs(problem.clone());
    stopwatch.stop();

    let elapsed = stopwatch.elapsed();
    println!("{name}: {moves} moves over all goals in {}", human_duration(&elapsed));
    if elapsed > MAX_INSTANCE_TIME {
        log::warn!(
            "Skipping {name} as it takes too long with BFS ({})",
            human_duration(&elapsed)
        );
        return true;
    }
    false
}

fn sample_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("River Crossing BFS");

    for path in glob("data/puzzles/*.json")
        .unwrap()
        .filter_map(std::result::Result::ok)
    {
        let name = path.file_stem().unwrap().to_str().unwrap().to_string();
        let problem = RiverCrossingProblem::try_from(path.as_path()).unwrap();
        if too_slow(&name, &problem) {
            continue;
        }
        group.bench_with_input(BenchmarkId::new("Puzzle", &name), &problem, |b, p| {
            b.iter(|| bfs(p.clone()))
        });
    }

    for n in [4, 8, 12, 16] {
        for capacity in [2, 3] {
            let name = format!("{n}x{capacity}");
            let problem = chain(n, capacity);
            if too_slow(&name, &problem) {
                continue;
            }
            group.bench_with_input(BenchmarkId::new("Chain", &name), &problem, |b, p| {
                b.iter(|| bfs(p.clone()))
            });
        }
    }
    group.finish();
}

criterion_group!(benches, sample_search);
criterion_main!(benches);
