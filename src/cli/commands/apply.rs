use uuid::Uuid;

use crate::cli::config::{
    clear_wizard_session, load_session_config, load_wizard_session, save_wizard_session,
};
use crate::cli::utils::{print_field_errors, prompt, prompt_yes_no, read_line};
use crate::database::models::application::Project;
use crate::wizard::{FormSession, HttpGateway, Step, StepOutcome, SubmitOutcome};

/// What a page interaction decided for the outer loop
enum PageAction {
    /// Keep walking the wizard
    Continue,
    /// Persist the session locally and return to the shell
    Quit,
    /// The application went through; nothing left to resume
    Done,
}

pub async fn handle(edit: Option<Uuid>, fresh: bool) -> anyhow::Result<()> {
    let config = load_session_config()?;
    let token = config
        .token
        .clone()
        .ok_or_else(|| anyhow::anyhow!("Not signed in. Run `intern auth login <email>` first."))?;
    let gateway = HttpGateway::new(config.base_url.clone(), token);

    let mut session = if let Some(id) = edit {
        let application = gateway
            .fetch(id)
            .await
            .map_err(|e| anyhow::anyhow!("could not load application {}: {}", id, e))?;
        println!("Editing application {}.", id);
        FormSession::load_existing(&application)
    } else if fresh {
        clear_wizard_session()?;
        FormSession::new()
    } else {
        match load_wizard_session()? {
            Some(saved) => {
                println!("Resuming your saved application at step {}.", saved.step.number());
                saved
            }
            None => FormSession::new(),
        }
    };

    loop {
        let action = match session.step {
            Step::Personal => page_personal(&mut session, &gateway).await?,
            Step::Education => page_education(&mut session, &gateway).await?,
            Step::Projects => page_projects(&mut session, &gateway).await?,
            Step::Confirmation => {
                println!();
                println!("✓ Thank you! Your application has been submitted.");
                println!("We will review your details and get back to you if you are shortlisted.");
                session.reset();
                PageAction::Done
            }
        };

        match action {
            PageAction::Continue => {
                // Serialize between steps so an interrupted run resumes
                save_wizard_session(&session)?;
            }
            PageAction::Quit => {
                save_wizard_session(&session)?;
                println!("Progress saved. Resume with `intern apply`.");
                break;
            }
            PageAction::Done => {
                clear_wizard_session()?;
                break;
            }
        }
    }

    Ok(())
}

fn print_header(session: &FormSession) {
    println!();
    println!("── Step {}/4: {} ──", session.step.number(), session.step.title());
}

async fn page_personal(
    session: &mut FormSession,
    gateway: &HttpGateway,
) -> anyhow::Result<PageAction> {
    print_header(session);

    let draft = &mut session.draft;
    draft.name = prompt("Full name", &draft.name)?;
    draft.email = prompt("Email address", &draft.email)?;
    draft.address_line1 = prompt("Street address", &draft.address_line1)?;
    let line2 = prompt(
        "Apartment, suite, etc. (optional)",
        draft.address_line2.as_deref().unwrap_or(""),
    )?;
    draft.address_line2 = if line2.trim().is_empty() { None } else { Some(line2) };
    draft.city = prompt("City", &draft.city)?;
    draft.state = prompt("State / province", &draft.state)?;
    draft.zipcode = prompt("Zip / postal code", &draft.zipcode)?;

    loop {
        println!("[n] next: education   [s] save draft and exit   [q] quit without saving to server");
        match read_line()?.as_str() {
            "n" => match session.next(gateway).await {
                StepOutcome::Advanced(_) => return Ok(PageAction::Continue),
                StepOutcome::AdvancedWithWarning { warning, .. } => {
                    eprintln!("Warning: {}", warning);
                    return Ok(PageAction::Continue);
                }
                StepOutcome::Invalid(errors) => {
                    eprintln!("Please fix the following before continuing:");
                    print_field_errors(&errors);
                    return Ok(PageAction::Continue);
                }
            },
            "s" => {
                // Back-to-start still flushes the draft first
                if let StepOutcome::AdvancedWithWarning { warning, .. } =
                    session.back(gateway).await
                {
                    eprintln!("Warning: {}", warning);
                }
                return Ok(PageAction::Quit);
            }
            "q" => return Ok(PageAction::Quit),
            _ => println!("Unknown choice."),
        }
    }
}

async fn page_education(
    session: &mut FormSession,
    gateway: &HttpGateway,
) -> anyhow::Result<PageAction> {
    print_header(session);

    let draft = &mut session.draft;
    draft.is_studying = prompt_yes_no("Are you currently enrolled in studies?", draft.is_studying)?;
    if draft.is_studying {
        let institution = prompt(
            "Name of institution",
            draft.studying_at.as_deref().unwrap_or(""),
        )?;
        draft.studying_at = if institution.trim().is_empty() {
            None
        } else {
            Some(institution)
        };
    } else {
        draft.studying_at = None;
    }

    loop {
        println!("[n] next: projects   [b] back: personal details   [q] quit");
        match read_line()?.as_str() {
            "n" => match session.next(gateway).await {
                StepOutcome::Advanced(_) => return Ok(PageAction::Continue),
                StepOutcome::AdvancedWithWarning { warning, .. } => {
                    eprintln!("Warning: {}", warning);
                    return Ok(PageAction::Continue);
                }
                StepOutcome::Invalid(errors) => {
                    eprintln!("Please fix the following before continuing:");
                    print_field_errors(&errors);
                    return Ok(PageAction::Continue);
                }
            },
            "b" => {
                if let StepOutcome::AdvancedWithWarning { warning, .. } =
                    session.back(gateway).await
                {
                    eprintln!("Warning: {}", warning);
                }
                return Ok(PageAction::Continue);
            }
            "q" => return Ok(PageAction::Quit),
            _ => println!("Unknown choice."),
        }
    }
}

async fn page_projects(
    session: &mut FormSession,
    gateway: &HttpGateway,
) -> anyhow::Result<PageAction> {
    print_header(session);

    // Always give the prompt loop an entry to edit
    if session.draft.projects.is_empty() {
        session.draft.projects.push(Project::default());
    }

    loop {
        println!();
        for (idx, project) in session.draft.projects.iter().enumerate() {
            let title = if project.name.trim().is_empty() {
                "(untitled)"
            } else {
                &project.name
            };
            println!("  #{} {}", idx + 1, title);
        }
        println!(
            "[a] add project   [e <n>] edit   [r <n>] remove   [s] submit   [b] back   [q] quit"
        );

        let input = read_line()?;
        let (command, arg) = match input.split_once(' ') {
            Some((c, a)) => (c, a.trim()),
            None => (input.as_str(), ""),
        };

        match command {
            "a" => {
                let idx = session.draft.projects.len();
                session.draft.projects.push(Project::default());
                edit_project(session, idx)?;
            }
            "e" => match parse_index(arg, session.draft.projects.len()) {
                Some(idx) => edit_project(session, idx)?,
                None => println!("Usage: e <number>"),
            },
            "r" => match parse_index(arg, session.draft.projects.len()) {
                Some(idx) => {
                    session.draft.projects.remove(idx);
                    if session.draft.projects.is_empty() {
                        session.draft.projects.push(Project::default());
                    }
                }
                None => println!("Usage: r <number>"),
            },
            "s" => match session.submit(gateway).await {
                SubmitOutcome::Submitted(_) => return Ok(PageAction::Continue),
                SubmitOutcome::Invalid(errors) => {
                    eprintln!("Please fix the following before submitting:");
                    print_field_errors(&errors);
                }
                SubmitOutcome::Failed(message) => {
                    // Unlike draft saves, a failed submission blocks;
                    // the applicant retries from here
                    eprintln!("{}", message);
                }
            },
            "b" => {
                if let StepOutcome::AdvancedWithWarning { warning, .. } =
                    session.back(gateway).await
                {
                    eprintln!("Warning: {}", warning);
                }
                return Ok(PageAction::Continue);
            }
            "q" => return Ok(PageAction::Quit),
            _ => println!("Unknown choice."),
        }
    }
}

fn edit_project(session: &mut FormSession, idx: usize) -> anyhow::Result<()> {
    let project = &mut session.draft.projects[idx];
    project.name = prompt("Project title", &project.name)?;
    project.description = prompt("Brief description", &project.description)?;
    Ok(())
}

fn parse_index(arg: &str, len: usize) -> Option<usize> {
    arg.parse::<usize>()
        .ok()
        .filter(|n| (1..=len).contains(n))
        .map(|n| n - 1)
}
