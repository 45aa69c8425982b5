//! The GLR* driver: a generalized shift-reduce loop over a graph-structured stack, with
//! noise skipping and skip-count-based local ambiguity resolution.
//!
//! The algorithm follows Lavie & Tomita, "GLR*: an efficient noise-skipping parsing
//! algorithm for context-free grammars" (Recent Advances in Parsing Technology, 1996).

use crate::{Action, ParseArg, ParseNode, ParseSettings, ParsingTable, Symbol};
use ptree::TreeItem;
use std::borrow::Cow;
use std::fmt::{Debug, Display, Formatter, Write};
use std::ops::Index;
use std::rc::Rc;

/// A node of the graph-structured stack: one parser configuration.
///
/// Nodes live in an arena and refer to their parent by index. Edges always point at
/// lower indices, so the stack is a DAG by construction, and beam pruning never
/// invalidates a parent still referenced from a live configuration.
struct GssNode<T> {
    /// Table state, or [None] for a dead end created by a goto-less reduction.
    state: Option<usize>,
    symbol: Option<ParseArg<T>>,
    parent: Option<usize>,
    start_pos: isize,
    end_pos: usize,
    /// How many input positions inside this node's span were absorbed by no shift.
    skipped: usize,
}

/// Parse a token stream against a compiled [ParsingTable].
///
/// Per input token the driver runs a shift phase over all live configurations, then a
/// reduce phase that keeps folding until no reduction applies, forking on conflicting
/// actions. Tokens no configuration can absorb are skipped and accounted against the
/// nodes shifted over them; competing reductions over the same production root are
/// resolved in favour of the smallest skip count (ties keep the newer candidate).
///
/// Returns every surviving parse whose production equals the requested root, in
/// insertion order. Unparseable or empty input yields an empty list, never an error.
pub fn parse<T: Clone + Debug>(
    input_tokens: impl IntoIterator<Item = T>,
    table: &ParsingTable<T>,
    settings: &ParseSettings,
) -> Vec<Rc<ParseNode<T>>> {
    let mut arena: Vec<GssNode<T>> = vec![GssNode {
        state: Some(0),
        symbol: None,
        parent: None,
        start_pos: -1,
        end_pos: 0,
        skipped: 0,
    }];

    // Configurations that survived the previous step and may shift the next token.
    let mut inactive: Vec<usize> = vec![0];
    // LIFO queue of nodes awaiting reduction probing within the current step.
    let mut active: Vec<usize> = Vec::new();

    let mut stream = input_tokens.into_iter().enumerate();
    let (mut position, mut token) = match stream.next() {
        Some(first) => first,
        None => return Vec::new(),
    };

    let mut step = 0usize;
    loop {
        step += 1;

        // A token is resolved once per step; resolvers are pure, so every shift and
        // reduce probe of this step can reuse the outcome.
        let resolution = table.resolve(&token);
        log::trace!(
            "step {}: lookahead {:?} at {} ({})",
            step,
            token,
            position,
            if resolution.is_some() { "resolved" } else { "skipped" }
        );

        if let Some(resolution) = &resolution {
            // Shift phase. Only configurations alive at the start of the step shift.
            let live = inactive.len();
            for index in 0..live {
                let node = inactive[index];
                let state = match arena[node].state {
                    Some(state) => state,
                    None => continue,
                };
                let target = table
                    .actions(resolution, state)
                    .iter()
                    .find_map(|action| match action {
                        Action::Shift(target) => Some(*target),
                        _ => None,
                    });
                let target = match target {
                    Some(target) => target,
                    None => continue,
                };
                let id = arena.len();
                arena.push(GssNode {
                    state: Some(target),
                    symbol: Some(ParseArg::Symbol(Symbol {
                        value: token.clone(),
                        position,
                        meta: resolution.meta,
                    })),
                    parent: Some(node),
                    start_pos: position as isize,
                    end_pos: position + 1,
                    skipped: position - arena[node].end_pos,
                });
                inactive.push(id);
                active.push(id);
            }

            if settings.verbose {
                log::debug!("step {} after shift:\n{}", step, dump_stack(&arena, &inactive, &active));
            }

            // Reduce phase. Reductions enqueue their result, so folding cascades until
            // the queue runs dry.
            let mut results: Vec<usize> = Vec::new();
            while let Some(node) = active.pop() {
                let state = match arena[node].state {
                    Some(state) => state,
                    None => continue,
                };
                for action in table.actions(resolution, state) {
                    let rule = match action {
                        Action::Reduce(rule) => rule,
                        Action::Shift(_) => continue,
                    };

                    // Walk one parent link per body query, collecting the matched
                    // symbols right to left and landing at the production root.
                    let body_len = rule.queries.len();
                    let mut args: Vec<ParseArg<T>> = Vec::with_capacity(body_len);
                    let mut skipped = 0usize;
                    let mut production_root = node;
                    let mut complete = true;
                    for _ in 0..body_len {
                        match (&arena[production_root].symbol, arena[production_root].parent) {
                            (Some(symbol), Some(parent)) => {
                                args.push(symbol.clone());
                                skipped += arena[production_root].skipped;
                                production_root = parent;
                            }
                            _ => {
                                complete = false;
                                break;
                            }
                        }
                    }
                    if !complete {
                        continue;
                    }
                    args.reverse();

                    let goto_from = match arena[production_root].state {
                        Some(state) => state,
                        None => continue,
                    };
                    // The root production's reduction has no goto target; the node still
                    // carries the finished parse, so it joins the graph as a dead end.
                    let next_state = table.goto_state(goto_from, &rule.production);

                    let candidate = GssNode {
                        state: next_state,
                        symbol: Some(ParseArg::Node(Rc::new(ParseNode {
                            rule: rule.clone(),
                            args,
                        }))),
                        parent: Some(production_root),
                        start_pos: arena[production_root].start_pos,
                        end_pos: arena[node].end_pos,
                        skipped,
                    };

                    // Local ambiguity resolution: reductions sharing a production root
                    // compete, and the smallest skip count wins. Ties keep the newer
                    // candidate; displaced rivals drop out of the pending merge.
                    let competitors: Vec<usize> = results
                        .iter()
                        .copied()
                        .filter(|&rival| {
                            arena[rival].parent == candidate.parent
                                && matches!(arena[rival].symbol, Some(ParseArg::Node(_)))
                        })
                        .collect();
                    if competitors
                        .iter()
                        .any(|&rival| arena[rival].skipped < candidate.skipped)
                    {
                        log::trace!(
                            "step {}: reduction by {} with {} skipped loses to a rival",
                            step,
                            rule,
                            candidate.skipped
                        );
                        continue;
                    }
                    if !competitors.is_empty() {
                        results.retain(|result| !competitors.contains(result));
                    }

                    let id = arena.len();
                    arena.push(candidate);
                    active.push(id);
                    results.push(id);
                }
            }

            inactive.extend(&results);

            if settings.verbose {
                log::debug!("step {} after reduce:\n{}", step, dump_stack(&arena, &inactive, &active));
            }
        }

        match stream.next() {
            Some((next_position, next_token)) => {
                position = next_position;
                token = next_token;
            }
            None => break,
        }

        // Beam pruning: the shift phase appends, so recency correlates with progress.
        if settings.beam_limit > 0 && inactive.len() > settings.beam_limit {
            let cut = inactive.len() - settings.beam_limit;
            inactive.drain(..cut);
        }
    }

    inactive
        .iter()
        .filter_map(|&id| match &arena[id].symbol {
            Some(ParseArg::Node(node)) if node.rule.production == settings.root_production => {
                Some(node.clone())
            }
            _ => None,
        })
        .collect()
}

fn dump_stack<T: Debug>(arena: &[GssNode<T>], inactive: &[usize], active: &[usize]) -> String {
    let mut out = String::new();
    for &id in inactive {
        let node = &arena[id];
        let marker = if active.contains(&id) { '@' } else { '*' };
        let _ = writeln!(
            out,
            "  {} #{} state={:?} parent={:?} span={}..{} skipped={} {}",
            marker,
            id,
            node.state,
            node.parent,
            node.start_pos,
            node.end_pos,
            node.skipped,
            symbol_label(&node.symbol)
        );
    }
    out
}

fn symbol_label<T: Debug>(symbol: &Option<ParseArg<T>>) -> String {
    match symbol {
        None => String::from("-"),
        Some(ParseArg::Symbol(symbol)) => format!("{:?}", symbol.value),
        Some(ParseArg::Node(node)) => node.rule.production.clone(),
    }
}

impl ParseSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// The production whose parses are harvested from the surviving configurations.
    pub fn root<S: Into<String>>(mut self, production: S) -> Self {
        self.root_production = production.into();
        self
    }

    /// Cap on live configurations kept between steps; 0 means unbounded.
    pub fn beam_limit(mut self, beam_limit: usize) -> Self {
        self.beam_limit = beam_limit;
        self
    }

    /// Dump the graph-structured stack after every phase, through the `log` facade.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl<T: Display> Display for Symbol<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T: Display> Display for ParseArg<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseArg::Symbol(symbol) => write!(f, "{}", symbol),
            ParseArg::Node(node) => write!(f, "{}", node),
        }
    }
}

impl<T: Display> Display for ParseNode<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.rule.production)?;
        for (index, arg) in self.args.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}

impl<T> ParseArg<T> {
    pub fn as_symbol(&self) -> Option<&Symbol<T>> {
        match self {
            ParseArg::Symbol(symbol) => Some(symbol),
            ParseArg::Node(_) => None,
        }
    }

    pub fn as_node(&self) -> Option<&ParseNode<T>> {
        match self {
            ParseArg::Symbol(_) => None,
            ParseArg::Node(node) => Some(node),
        }
    }
}

impl<T> ParseNode<T> {
    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParseArg<T>> {
        self.args.iter()
    }

    /// Find the first node of a production, searching depth-first through all nested
    /// children, self included.
    pub fn find_node(&self, production: &str) -> Option<&ParseNode<T>> {
        if self.rule.production == production {
            Some(self)
        } else {
            self.args.iter().find_map(|arg| match arg {
                ParseArg::Node(node) => node.find_node(production),
                ParseArg::Symbol(_) => None,
            })
        }
    }

    /// All shifted input symbols of the subtree, left to right.
    pub fn symbols(&self) -> Vec<&Symbol<T>> {
        let mut symbols = Vec::new();
        self.collect_symbols(&mut symbols);
        symbols
    }

    fn collect_symbols<'this>(&'this self, symbols: &mut Vec<&'this Symbol<T>>) {
        for arg in &self.args {
            match arg {
                ParseArg::Symbol(symbol) => symbols.push(symbol),
                ParseArg::Node(node) => node.collect_symbols(symbols),
            }
        }
    }
}

impl<T> Index<usize> for ParseNode<T> {
    type Output = ParseArg<T>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.args[index]
    }
}

impl<T: Clone + Display> TreeItem for ParseArg<T> {
    type Child = Self;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _: &ptree::Style) -> std::io::Result<()> {
        match self {
            ParseArg::Symbol(symbol) => write!(f, "{} # {}", symbol.value, symbol.position),
            ParseArg::Node(node) => write!(f, "{}", node.rule.production),
        }
    }

    fn children(&self) -> Cow<[Self::Child]> {
        match self {
            ParseArg::Symbol(_) => Cow::from(Vec::new()),
            ParseArg::Node(node) => Cow::from(node.args.clone()),
        }
    }
}

impl<T: Clone + Display> ParseNode<T> {
    /// Pretty-print the parse tree to stdout.
    pub fn print(&self) -> Result<(), std::io::Error> {
        ptree::print_tree(&ParseArg::Node(Rc::new(self.clone())))
    }
}
