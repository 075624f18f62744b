// dsviz: step-tracing data structure engines with a terminal replay viewer

use std::io;
use std::process;

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use dsviz::dijkstra::{DijkstraEngine, PRESETS};
use dsviz::expression::{InfixConverter, PostfixEvaluator, format_number, join};
use dsviz::heap::HeapEngine;
use dsviz::huffman::HuffmanEngine;
use dsviz::input::parse_list;
use dsviz::linear::{BoundedQueue, BoundedStack, MessageQueue};
use dsviz::linked_list::{LinkedListEngine, ListKind};
use dsviz::polynomial::PolynomialEngine;
use dsviz::snapshot::Traced;
use dsviz::tree::{TraversalOrder, TreeEngine};
use dsviz::ui::{App, Describe, Recording};

const USAGE: &[(&str, &str)] = &[
    ("bst <values> [order]", "insert into a BST, optionally traverse"),
    ("avl <values> [order]", "insert into an AVL tree, optionally traverse"),
    ("heap <values>", "build a max-heap"),
    ("huffman <text>", "build Huffman codes"),
    ("dijkstra [preset]", "shortest path on preset graph 0, 1 or 2"),
    ("infix <expression>", "convert infix to postfix"),
    ("postfix <expression>", "evaluate a space separated postfix expression"),
    ("list <sll|dll|csll|cdll> <values> [reverse]", "build a linked list"),
    ("stack <values>", "push onto a bounded stack"),
    ("queue <values>", "enqueue into a bounded queue"),
    ("messages <m1,m2,...>", "produce messages and let consumers take turns"),
    ("polynomial [first second]", "multiply two polynomials"),
];

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} <scenario> [args...] [--json]", program);
    eprintln!();
    eprintln!("Scenarios:");
    for (form, what) in USAGE {
        eprintln!("  {:<44} {}", form, what);
    }
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} avl 10,20,30,40,50 inorder", program);
    eprintln!("  {} infix \"(1+2)*3\" --json", program);
    eprintln!();
    eprintln!("Set DSVIZ_LOG=debug to log engine operations to stderr.");
    process::exit(1);
}

/// Positional arguments after the scenario name
struct Cli<'a> {
    program: &'a str,
    scenario: &'a str,
    rest: &'a [String],
}

impl<'a> Cli<'a> {
    fn required(&self, index: usize) -> &'a str {
        match self.rest.get(index) {
            Some(arg) => arg.as_str(),
            None => {
                eprintln!("Error: Missing argument for '{}'", self.scenario);
                eprintln!();
                usage(self.program)
            }
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("DSVIZ_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let mut args: Vec<String> = std::env::args().collect();
    let program = args.first().cloned().unwrap_or_else(|| "dsviz".to_string());
    let json = args.iter().any(|a| a == "--json");
    args.retain(|a| a != "--json");

    let Some(scenario) = args.get(1).map(|s| s.to_ascii_lowercase()) else {
        eprintln!("Error: No scenario provided");
        eprintln!();
        usage(&program);
    };
    let rest = &args[2..];
    let cli = Cli {
        program: &program,
        scenario: &scenario,
        rest,
    };

    match scenario.as_str() {
        "bst" | "avl" => {
            let mut tree = if scenario == "bst" {
                TreeEngine::bst()
            } else {
                TreeEngine::avl()
            };
            for value in parse_list(cli.required(0)) {
                tree.insert(value);
            }
            eprintln!("Inserted {} node(s), height {}", tree.len(), tree.analyze().height);
            if let Some(text) = rest.get(1) {
                let Some(order) = TraversalOrder::parse(text) else {
                    eprintln!("Error: Unknown traversal order '{}'", text);
                    process::exit(1);
                };
                tree.traverse(order);
                eprintln!("{} traversal: {:?}", order, tree.traversal_history());
            }
            present(&format!("{} tree", scenario.to_ascii_uppercase()), &tree, json)
        }
        "heap" => {
            let mut heap = HeapEngine::default();
            heap.insert_many(cli.required(0));
            eprintln!("{}: {:?}", heap.kind(), heap.items());
            present("Heap", &heap, json)
        }
        "huffman" => {
            let mut huffman = HuffmanEngine::new();
            if !huffman.encode(cli.required(0)) {
                eprintln!("Error: Nothing to encode");
                process::exit(1);
            }
            for (symbol, code) in huffman.codes() {
                eprintln!("  '{}' = {}", symbol, code);
            }
            if let Some(stats) = huffman.compression_stats() {
                eprintln!(
                    "{} bits -> {} bits ({:.1}% saved)",
                    stats.original_bits, stats.compressed_bits, stats.space_saving
                );
            }
            present("Huffman", &huffman, json)
        }
        "dijkstra" => {
            let index = match rest.first() {
                Some(text) => match text.parse::<usize>() {
                    Ok(index) if index < PRESETS.len() => index,
                    _ => {
                        eprintln!("Error: Preset must be 0 to {}", PRESETS.len() - 1);
                        process::exit(1);
                    }
                },
                None => 0,
            };
            let mut dijkstra = DijkstraEngine::new();
            dijkstra.load_example(index);
            if let Some(result) = dijkstra.find_path() {
                eprintln!(
                    "{}: distance {}, path {}",
                    PRESETS[index].name,
                    format_number(result.distance),
                    result.path.join(" -> ")
                );
            }
            present(PRESETS[index].name, &dijkstra, json)
        }
        "infix" => {
            let mut converter = InfixConverter::new();
            match converter.convert(cli.required(0)) {
                Ok(Some(postfix)) => eprintln!("Postfix: {}", join(&postfix)),
                Ok(None) => {}
                Err(e) => {
                    eprintln!("Error: {}", e);
                    process::exit(1);
                }
            }
            present("Infix to postfix", &converter, json)
        }
        "postfix" => {
            let mut evaluator = PostfixEvaluator::new();
            match evaluator.evaluate_str(cli.required(0)) {
                Ok(Some(value)) => eprintln!("Result: {}", format_number(value)),
                Ok(None) => {}
                Err(e) => {
                    eprintln!("Error: {}", e);
                    process::exit(1);
                }
            }
            present("Postfix evaluation", &evaluator, json)
        }
        "list" => {
            let Some(kind) = ListKind::parse(cli.required(0)) else {
                eprintln!("Error: Unknown list kind '{}'", cli.required(0));
                process::exit(1);
            };
            let mut list = LinkedListEngine::new(kind);
            for value in parse_list(cli.required(1)) {
                list.insert_back(value);
                list.settle();
            }
            if rest.get(2).is_some_and(|a| a == "reverse") {
                list.reverse();
            }
            eprintln!("{}: {:?}", kind, list.values());
            present(&kind.to_string(), &list, json)
        }
        "stack" => {
            let mut stack = BoundedStack::new();
            for value in parse_list(cli.required(0)) {
                stack.push(value);
                stack.settle();
            }
            present("Stack", &stack, json)
        }
        "queue" => {
            let mut queue = BoundedQueue::new();
            for value in parse_list(cli.required(0)) {
                queue.enqueue(value);
                queue.settle();
            }
            present("Queue", &queue, json)
        }
        "messages" => {
            let mut mq = MessageQueue::new();
            let producers = mq.producers().len();
            for (i, content) in cli.required(0).split(',').enumerate() {
                mq.produce(i % producers, content);
            }
            let mut turn = 0;
            while mq.pending() > 0 {
                let consumer = turn % mq.consumers().len();
                mq.complete(consumer);
                mq.process_next(consumer);
                mq.settle();
                turn += 1;
            }
            for consumer in mq.consumers() {
                eprintln!("{}: {} processed", consumer.name, consumer.processed_count);
            }
            present("Message queue", &mq, json)
        }
        "polynomial" => {
            let mut polynomial = PolynomialEngine::new();
            let loaded = match (rest.first(), rest.get(1)) {
                (Some(first), Some(second)) => polynomial.set_operands(first, second),
                _ => polynomial.load_example(),
            };
            if !loaded {
                eprintln!("Error: Could not parse both polynomials");
                process::exit(1);
            }
            match polynomial.multiply() {
                Ok(Some(product)) => eprintln!("Product: {}", product),
                Ok(None) => {}
                Err(e) => {
                    eprintln!("Error: {}", e);
                    process::exit(1);
                }
            }
            present("Polynomial multiplication", &polynomial, json)
        }
        other => {
            eprintln!("Error: Unknown scenario '{}'", other);
            eprintln!();
            usage(&program);
        }
    }
}

/// Print the engine's trace as JSON, or open the replay viewer on it
fn present<E>(title: &str, engine: &E, json: bool) -> Result<(), Box<dyn std::error::Error>>
where
    E: Traced,
    E::State: Describe<E::Key> + Serialize,
    E::Key: Serialize,
{
    if json {
        println!("{}", serde_json::to_string_pretty(engine.replay().steps())?);
        return Ok(());
    }

    let recording = Recording::capture(title, engine);

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(recording);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
