use std::path::Path;

use clap::Parser;
use dialoguer::Select;
use lawbook::{
    domain::{Completion, Outcome, Tab},
    extract::categorise,
    DocId, Hierarchy, Library, Resolved, Session,
};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Browse the library interactively, following references")]
pub struct Browse {
    /// The article to start from
    #[arg(value_parser = super::parse_doc_id)]
    start: Option<DocId>,
}

/// One selectable action in the browsing menu.
enum Action {
    View(DocId),
    Back,
    Jump(usize),
    Switch(Tab),
    Quit,
}

impl Browse {
    #[instrument(skip(root))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let library = Library::open(root)?;
        if library.catalog().is_empty() {
            anyhow::bail!("The library is empty; run `laws extract` first");
        }

        let mut session = Session::default();
        if let Some(start) = self.start {
            look_up(&library, &mut session, start);
        }

        loop {
            let (labels, actions) = menu(&library, &session);
            let Ok(choice) = Select::new()
                .with_prompt(prompt(&library, &session))
                .items(&labels)
                .default(0)
                .interact()
            else {
                // Ctrl-C or a closed terminal ends the session.
                return Ok(());
            };

            match actions
                .into_iter()
                .nth(choice)
                .unwrap_or(Action::Quit)
            {
                Action::View(id) => look_up(&library, &mut session, id),
                Action::Back => {
                    session.back();
                }
                Action::Jump(index) => {
                    if let Err(error) = session.jump_to(index) {
                        eprintln!("{}", error.to_string().warning());
                    }
                }
                Action::Switch(tab) => session.switch_tab(tab),
                Action::Quit => return Ok(()),
            }
        }
    }
}

/// Requests, resolves, and completes a lookup in one step.
///
/// Resolution is synchronous here, but the session still tags the request
/// with a generation so the flow matches asynchronous front ends.
fn look_up(library: &Library, session: &mut Session, target: DocId) {
    let request = session.request(target);
    let found = matches!(library.resolve(target), Resolved::Found { .. });
    let outcome = session.complete(Completion {
        target: request.target,
        generation: request.generation,
        found,
    });
    if let Outcome::NotFound(id) = outcome {
        eprintln!("{}", format!("{id} not found").warning());
    }
}

/// The header shown above the menu: the current document or the tab listing.
fn prompt(library: &Library, session: &Session) -> String {
    match session.current().map(|id| library.resolve(id)) {
        Some(Resolved::Found { document, .. }) => {
            let trail = session
                .trail()
                .entries()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" > ");
            format!("{trail}\n{} {}", document.id(), document.title())
        }
        _ => match session.tab() {
            Tab::Code => "Code laws".to_string(),
            Tab::Rnc => "National regulations".to_string(),
            Tab::Categories => "Categories".to_string(),
        },
    }
}

/// Builds the selectable items for the current session state.
fn menu(library: &Library, session: &Session) -> (Vec<String>, Vec<Action>) {
    let mut labels = Vec::new();
    let mut actions = Vec::new();

    if let Some(current) = session.current() {
        for reference in library.catalog().references_from(current) {
            let label = match &reference.context {
                Some(context) => format!("-> {}  {}", reference.to, context.dim()),
                None => format!("-> {}", reference.to),
            };
            labels.push(label);
            actions.push(Action::View(reference.to));
        }
        for id in library.catalog().referenced_by(current) {
            labels.push(format!("<- {id}"));
            actions.push(Action::View(id));
        }
        if session.trail().len() > 1 {
            labels.push("back".to_string());
            actions.push(Action::Back);
        }
        for (index, crumb) in session.trail().entries().iter().enumerate() {
            labels.push(format!("back to {crumb}"));
            actions.push(Action::Jump(index));
        }
    } else {
        match session.tab() {
            Tab::Code | Tab::Rnc => {
                let hierarchy = if session.tab() == Tab::Code {
                    Hierarchy::Code
                } else {
                    Hierarchy::Rnc
                };
                for document in library.catalog().list(hierarchy) {
                    labels.push(format!("{} {}", document.id(), document.title()));
                    actions.push(Action::View(document.id()));
                }
            }
            Tab::Categories => {
                for (category, ids) in categorise(library.catalog().documents()) {
                    for id in ids {
                        labels.push(format!("{category} / {id}"));
                        actions.push(Action::View(id));
                    }
                }
            }
        }
    }

    for (tab, label) in [
        (Tab::Code, "code tab"),
        (Tab::Rnc, "rnc tab"),
        (Tab::Categories, "categories tab"),
    ] {
        if tab != session.tab() || session.current().is_some() {
            labels.push(label.to_string());
            actions.push(Action::Switch(tab));
        }
    }

    labels.push("quit".to_string());
    actions.push(Action::Quit);

    (labels, actions)
}
