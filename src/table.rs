//! Canonical LR(0) item-set construction and the parsing table it compiles into.
//!
//! The construction is deliberately permissive: completed items emit a reduce action
//! under *every* terminal query, and shift actions coexist with reduce actions in the
//! same cell. Conflicts are not errors: the GLR* driver forks a configuration per
//! applicable action and lets noise-skipping ambiguity resolution sort the survivors.

use crate::{
    Action, EntryId, GrammarError, IResolver, ParsingTable, Query, Resolution, Rule, TerminalQuery,
};
use std::collections::{BTreeSet, HashMap};
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// A dotted rule: parse progress through one rule body. Rules are identified by their
/// index in the rule list, so duplicate rules stay distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Item {
    rule: usize,
    dot: usize,
}

/// A state of the construction: an item set in canonical order.
type ItemSet = BTreeSet<Item>;

impl Item {
    fn advanced(self) -> Self {
        Item {
            rule: self.rule,
            dot: self.dot + 1,
        }
    }
}

/// The query expected right after the dot, or [None] for a completed item.
fn expected_query(item: Item, rules: &[Rc<Rule>]) -> Option<&Query> {
    rules[item.rule].queries.get(item.dot)
}

struct ItemDisplay<'rules> {
    item: Item,
    rules: &'rules [Rc<Rule>],
}

impl<'rules> Display for ItemDisplay<'rules> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let rule = &self.rules[self.item.rule];
        write!(f, "{} =", rule.production)?;
        for (index, query) in rule.queries.iter().enumerate() {
            if index == self.item.dot {
                write!(f, " •")?;
            }
            write!(f, " {}", query)?;
        }
        if self.item.dot == rule.queries.len() {
            write!(f, " •")?;
        }
        Ok(())
    }
}

/// Closure: while any item expects a reference query, pull in the dot-at-start items of
/// every rule producing the referenced production.
fn close_items(items: &mut ItemSet, rules: &[Rc<Rule>]) {
    let mut pending: Vec<Item> = items.iter().copied().collect();
    while let Some(item) = pending.pop() {
        if let Some(Query::Reference(reference)) = expected_query(item, rules) {
            for (index, rule) in rules.iter().enumerate() {
                if rule.production == reference.reference {
                    let start = Item {
                        rule: index,
                        dot: 0,
                    };
                    if items.insert(start) {
                        pending.push(start);
                    }
                }
            }
        }
    }
}

/// Group the outgoing transitions of a state by the expected query, in first-seen order,
/// returning the advanced core items of each target.
fn transitions_from(items: &ItemSet, rules: &[Rc<Rule>]) -> Vec<(Query, ItemSet)> {
    let mut transitions: Vec<(Query, ItemSet)> = Vec::new();
    for item in items {
        if let Some(query) = expected_query(*item, rules) {
            match transitions.iter_mut().find(|(existing, _)| existing == query) {
                Some((_, core)) => {
                    core.insert(item.advanced());
                }
                None => transitions.push((query.clone(), ItemSet::from([item.advanced()]))),
            }
        }
    }
    transitions
}

/// Construct a [ParsingTable] from a rule list and a resolver list.
///
/// The start production is the first rule's production; the initial state seeds every
/// rule producing it, so alternatives of the start production all stay reachable. State
/// identity is item-set equality. Worst-case state growth is exponential in grammar
/// size; [ParsingTable::state_count] exposes the outcome for diagnostics.
pub fn build_parsing_table<T>(
    rules: Vec<Rule>,
    resolvers: Vec<Box<dyn IResolver<T>>>,
) -> Result<ParsingTable<T>, GrammarError> {
    if rules.is_empty() {
        return Err(GrammarError::new(
            "rules",
            "at least one rule is required to build a parsing table",
        ));
    }
    let rules: Vec<Rc<Rule>> = rules.into_iter().map(Rc::new).collect();

    // Distinct terminal queries, in first-seen order.
    let mut terminal_queries: Vec<TerminalQuery> = Vec::new();
    for rule in &rules {
        for query in &rule.queries {
            if let Query::Terminal(terminal) = query {
                if !terminal_queries.contains(terminal) {
                    terminal_queries.push(terminal.clone());
                }
            }
        }
    }

    // State 0: every rule of the start production at dot 0, closed.
    let start_production = rules[0].production.clone();
    let mut start_items: ItemSet = rules
        .iter()
        .enumerate()
        .filter(|(_, rule)| rule.production == start_production)
        .map(|(index, _)| Item {
            rule: index,
            dot: 0,
        })
        .collect();
    close_items(&mut start_items, &rules);

    // Expand all states and transitions from state 0.
    let mut states: Vec<ItemSet> = vec![start_items.clone()];
    let mut state_ids: HashMap<ItemSet, usize> = HashMap::from([(start_items, 0)]);
    let mut transitions: Vec<(usize, Query, usize)> = Vec::new();
    let mut pending: Vec<usize> = vec![0];
    while let Some(id) = pending.pop() {
        for (query, mut core) in transitions_from(&states[id], &rules) {
            close_items(&mut core, &rules);
            let target = match state_ids.get(&core) {
                Some(&existing) => existing,
                None => {
                    let fresh = states.len();
                    states.push(core.clone());
                    state_ids.insert(core, fresh);
                    pending.push(fresh);
                    fresh
                }
            };
            transitions.push((id, query, target));
        }
    }

    let mut table = ParsingTable::new(resolvers, states.len());

    // Completed items reduce under every terminal query; the driver's ambiguity
    // resolution picks the right lookahead at runtime. Computing follow sets here would
    // defeat noise skipping.
    for (id, state) in states.iter().enumerate() {
        if log::log_enabled!(log::Level::Debug) {
            for item in state {
                log::debug!(
                    "state {}\t{}",
                    id,
                    ItemDisplay {
                        item: *item,
                        rules: &rules
                    }
                );
            }
        }
        for item in state {
            if item.dot == rules[item.rule].queries.len() {
                let action = Action::Reduce(rules[item.rule].clone());
                for query in &terminal_queries {
                    table.add_action(id, query, action.clone());
                }
            }
        }
    }

    for (from, query, to) in &transitions {
        log::debug!("edge {} {} {}", from, query, to);
        match query {
            Query::Terminal(terminal) => table.add_action(*from, terminal, Action::Shift(*to)),
            Query::Reference(reference) => table.add_goto(*from, &reference.reference, *to),
        }
    }

    Ok(table)
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Shift(state) => write!(f, "S({})", state),
            Action::Reduce(rule) => write!(f, "R({})", rule),
        }
    }
}

impl PartialEq for Action {
    /// Reduce actions compare by rule identity, consistent with the item model where
    /// duplicate rules stay distinct.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Action::Shift(a), Action::Shift(b)) => a == b,
            (Action::Reduce(a), Action::Reduce(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<T> ParsingTable<T> {
    fn new(resolvers: Vec<Box<dyn IResolver<T>>>, state_count: usize) -> Self {
        Self {
            goto: HashMap::new(),
            entries: Vec::new(),
            entry_ids: HashMap::new(),
            resolvers,
            state_count,
        }
    }

    /// The action map entry of a terminal query, created on first use.
    fn entry_id(&mut self, query: &TerminalQuery) -> EntryId {
        match self.entry_ids.get(query) {
            Some(&entry) => entry,
            None => {
                let entry = EntryId(self.entries.len());
                self.entries.push(HashMap::new());
                self.entry_ids.insert(query.clone(), entry);
                entry
            }
        }
    }

    fn add_action(&mut self, state: usize, query: &TerminalQuery, action: Action) {
        let entry = self.entry_id(query);
        let cell = self.entries[entry.0].entry(state).or_default();
        if !cell.contains(&action) {
            cell.push(action);
        }
        for resolver in &mut self.resolvers {
            resolver.register(query, entry);
        }
    }

    fn add_goto(&mut self, state: usize, production: &str, next_state: usize) {
        self.goto
            .entry(state)
            .or_default()
            .insert(production.to_string(), next_state);
    }

    /// Ask the resolvers, in registration order, whether one of them can serve the
    /// token. The first resolver that recognises the token decides, even when its entry
    /// turns out to hold no action for the probed state.
    pub fn resolve(&self, token: &T) -> Option<Resolution> {
        self.resolvers.iter().find_map(|resolver| resolver.resolve(token))
    }

    /// All actions of the resolved token's entry for a state. Unknown states yield an
    /// empty slice, never an error.
    pub fn actions(&self, resolution: &Resolution, state: usize) -> &[Action] {
        self.entries[resolution.entry.0]
            .get(&state)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn goto_state(&self, state: usize, production: &str) -> Option<usize> {
        self.goto.get(&state)?.get(production).copied()
    }

    /// Number of LR(0) states the grammar compiled into.
    pub fn state_count(&self) -> usize {
        self.state_count
    }
}
