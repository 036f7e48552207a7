use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;

use pairsort::{advance, ItemList, Phase, Store};

fn print_list(list: &ItemList) {
    if list.is_empty() {
        println!("(no items)");
        return;
    }
    for (i, item) in list.items.iter().enumerate() {
        println!("{:>3}. {}", i + 1, item.value);
    }
}

fn prompt(text: &str) -> io::Result<()> {
    let mut out = io::stdout();
    write!(out, "{text}")?;
    out.flush()
}

/// Runs one sort walk to completion, asking pivot-vs-candidate questions on
/// the terminal. Returns false if input ended before the walk finished; the
/// abandoned walk's relation edits are simply discarded.
fn run_walk(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    list: &mut ItemList,
) -> Result<bool> {
    let mut state = list.start_sort();
    while state.phase == Phase::ChoosingPivot {
        println!();
        println!(
            "  [l] {}    vs    [r] {}",
            state.items[state.pivot_idx].value, state.items[state.compare_idx].value
        );
        prompt("which is bigger? [l/r] ")?;
        let Some(line) = lines.next() else {
            println!("sort abandoned");
            return Ok(false);
        };
        match line?.trim() {
            "l" => state = advance(&state, true),
            "r" => state = advance(&state, false),
            other => println!("unrecognized answer {other:?}, expected l or r"),
        }
    }
    list.commit(state);
    println!("\nsorted:");
    print_list(list);
    Ok(true)
}

fn main() -> Result<()> {
    env_logger::init();

    let dir = std::env::var_os("PAIRSORT_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let store = Store::open(&dir);
    let mut list = store.load_or_seed();
    store.save(&list)?;

    println!("pairsort — sort items by answering pairwise questions");
    println!("commands: add <item> | batch <a, b, c> | edit <n> <item> | rm <n> | clear | sort | list | quit");
    print_list(&list);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        prompt("> ")?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let line = line.trim();
        let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));
        match cmd {
            "" => {}
            "list" => print_list(&list),
            "add" => {
                if list.add(rest) {
                    store.save(&list)?;
                } else {
                    println!("nothing to add");
                }
            }
            "batch" => {
                let added = list.add_batch(rest);
                if added > 0 {
                    store.save(&list)?;
                }
                println!("added {added} item(s)");
            }
            "edit" => {
                if let Some((n, value)) = rest.split_once(' ') {
                    let idx = n.parse::<usize>().ok().and_then(|v| v.checked_sub(1));
                    if idx.is_some_and(|i| list.update(i, value)) {
                        store.save(&list)?;
                    } else {
                        println!("could not edit item {n:?}");
                    }
                } else {
                    println!("usage: edit <n> <item>");
                }
            }
            "rm" => {
                let idx = rest.parse::<usize>().ok().and_then(|v| v.checked_sub(1));
                if idx.and_then(|i| list.remove(i)).is_some() {
                    store.save(&list)?;
                } else {
                    println!("could not remove item {rest:?}");
                }
            }
            "clear" => {
                list.clear();
                store.save(&list)?;
            }
            "sort" => {
                if list.is_empty() {
                    println!("nothing to sort");
                } else {
                    run_walk(&mut lines, &mut list)?;
                    store.save(&list)?;
                }
            }
            "quit" | "q" | "exit" => break,
            other => println!("unknown command {other:?}"),
        }
    }
    Ok(())
}
