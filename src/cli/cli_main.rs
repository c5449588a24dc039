use super::display::{breakdown_table, compound_table, settings_table};
use crate::DBhandlers::pubchem_api::CompoundLookup;
use crate::Utils::show_image::open_in_viewer;
use crate::error::ChemCalcError;
use crate::session::Session;
use crate::settings::ConfigManager;
use log::warn;
use std::io::{self, BufRead, Write};

const DEFAULT_MOLARITY: f64 = 0.5;
const DEFAULT_VOLUME_ML: f64 = 500.0;

/* colors
Blue (\x1b[34m) - Welcome header text

Yellow (\x1b[33m) - Menu options

Cyan (\x1b[36m) - prompts

Green (\x1b[32m) - results, Red (\x1b[31m) - errors, Magenta (\x1b[35m) - warnings

Reset (\x1b[0m) - Returns to normal color after each colored section
*/

/// terminal wrapper: every read returns `None` at end of input
struct Console<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "\x1b[36m{}\x1b[0m", prompt)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// empty answer -> `None`, re-asks until the answer is a number
    fn ask_number(&mut self, prompt: &str) -> io::Result<Option<Option<f64>>> {
        loop {
            let Some(answer) = self.ask(prompt)? else {
                return Ok(None);
            };
            if answer.is_empty() {
                return Ok(Some(None));
            }
            match answer.parse::<f64>() {
                Ok(value) if value.is_finite() => return Ok(Some(Some(value))),
                _ => writeln!(self.output, "Invalid number '{}', try again.", answer)?,
            }
        }
    }

    fn report(&mut self, error: &ChemCalcError) -> io::Result<()> {
        if error.is_warning() {
            writeln!(self.output, "\x1b[35m{}\x1b[0m", error)?;
        } else {
            writeln!(self.output, "\x1b[31mError: {}\x1b[0m", error)?;
        }
        writeln!(self.output, "{}", error.hint())
    }
}

fn show_main_menu<W: Write>(output: &mut W) -> io::Result<()> {
    writeln!(
        output,
        "\x1b[34m\n ChemCalc: compound validator, molar mass and solution preparation\n \x1b[0m"
    )?;
    writeln!(output, "\x1b[33m1. Compound Validator & Properties (PubChem)\x1b[0m")?;
    writeln!(output, "\x1b[33m2. Molar Mass from Formula\x1b[0m")?;
    writeln!(output, "\x1b[33m3. Solution Preparation\x1b[0m")?;
    writeln!(output, "\x1b[33m4. Settings\x1b[0m")?;
    writeln!(output, "\x1b[33m0. Exit\x1b[0m")
}

pub fn run_interactive_menu<L, R, W>(
    session: &mut Session<L>,
    settings: &mut ConfigManager,
    input: R,
    output: W,
) -> io::Result<()>
where
    L: CompoundLookup,
    R: BufRead,
    W: Write,
{
    let mut console = Console { input, output };
    loop {
        show_main_menu(&mut console.output)?;
        let Some(choice) = console.ask("Enter your choice: ")? else {
            break;
        };
        match choice.as_str() {
            "1" => compound_menu(session, &mut console)?,
            "2" => molar_mass_menu(session, &mut console)?,
            "3" => solution_menu(session, &mut console)?,
            "4" => settings_menu(settings, &mut console)?,
            "0" => {
                writeln!(console.output, "Goodbye!")?;
                break;
            }
            _ => writeln!(console.output, "Invalid choice. Please try again.")?,
        }
    }
    Ok(())
}

fn compound_menu<L: CompoundLookup, R: BufRead, W: Write>(
    session: &mut Session<L>,
    console: &mut Console<R, W>,
) -> io::Result<()> {
    let Some(query) = console.ask("Enter Name or Formula (e.g., Aspirin, H2SO4): ")? else {
        return Ok(());
    };
    let query = if query.is_empty() { "Aspirin".to_string() } else { query };
    writeln!(console.output, "Searching PubChem for '{}'...", query)?;
    match session.search_compound(&query) {
        Ok(record) => {
            writeln!(console.output, "\x1b[32mFound: {}\x1b[0m", record.preferred_name)?;
            compound_table(&record).print(&mut console.output)?;
            let answer = console.ask("Open structure image in the default viewer? (y/N): ")?;
            if matches!(answer.as_deref(), Some("y") | Some("Y")) {
                if let Err(e) = open_in_viewer(&record.image_reference) {
                    warn!("Cannot open image viewer: {}", e);
                    writeln!(console.output, "Cannot open image viewer: {}", e)?;
                }
            }
        }
        Err(e) => console.report(&e)?,
    }
    Ok(())
}

fn molar_mass_menu<L: CompoundLookup, R: BufRead, W: Write>(
    session: &mut Session<L>,
    console: &mut Console<R, W>,
) -> io::Result<()> {
    let Some(formula) = console.ask("Enter a chemical formula (e.g., C6H12O6): ")? else {
        return Ok(());
    };
    match session.molar_mass(&formula) {
        Ok(result) => {
            breakdown_table(&result).print(&mut console.output)?;
            writeln!(
                console.output,
                "\x1b[32mMolar mass of {}: {:.3} g/mol\x1b[0m",
                result.formula, result.total_mass
            )?;
        }
        Err(e) => console.report(&e)?,
    }
    Ok(())
}

fn solution_menu<L: CompoundLookup, R: BufRead, W: Write>(
    session: &mut Session<L>,
    console: &mut Console<R, W>,
) -> io::Result<()> {
    match session.saved() {
        Some(saved) => writeln!(
            console.output,
            "\x1b[32mPreparing solution for: {}\x1b[0m",
            saved.name
        )?,
        None => writeln!(
            console.output,
            "Enter Molar Mass manually or validate a compound above."
        )?,
    }
    let prompt = format!(
        "Molar Mass (g/mol) [{:.3}]: ",
        session.default_molar_mass()
    );
    let Some(molar_mass) = console.ask_number(&prompt)? else {
        return Ok(());
    };
    let prompt = format!("Desired Molarity (M) [{}]: ", DEFAULT_MOLARITY);
    let Some(molarity) = console.ask_number(&prompt)? else {
        return Ok(());
    };
    let prompt = format!("Volume (mL) [{}]: ", DEFAULT_VOLUME_ML);
    let Some(volume_ml) = console.ask_number(&prompt)? else {
        return Ok(());
    };
    match session.prepare_solution(
        molar_mass,
        molarity.unwrap_or(DEFAULT_MOLARITY),
        volume_ml.unwrap_or(DEFAULT_VOLUME_ML),
    ) {
        Ok(recipe) => {
            writeln!(console.output, "\x1b[32m{}\x1b[0m", recipe.headline())?;
            writeln!(console.output, "{}", recipe.instruction())?;
        }
        Err(e) => console.report(&e)?,
    }
    Ok(())
}

fn settings_menu<R: BufRead, W: Write>(
    settings: &mut ConfigManager,
    console: &mut Console<R, W>,
) -> io::Result<()> {
    loop {
        writeln!(console.output, "\n=== Settings ({}) ===", settings.config_file())?;
        settings_table(settings.get_config()).print(&mut console.output)?;
        writeln!(
            console.output,
            "Changes apply after restart. Type key=value to change, 'reset' for defaults, empty line to go back."
        )?;
        let Some(answer) = console.ask("Setting: ")? else {
            return Ok(());
        };
        if answer.is_empty() {
            return Ok(());
        }
        if answer == "reset" {
            settings.reset_to_defaults();
        } else {
            let Some((key, value)) = answer.split_once('=') else {
                writeln!(console.output, "Expected key=value")?;
                continue;
            };
            if let Err(e) = settings.set_value(key, value) {
                writeln!(console.output, "\x1b[31mError: {}\x1b[0m", e)?;
                continue;
            }
        }
        if let Err(e) = settings.save_config() {
            writeln!(console.output, "\x1b[31mError: {}\x1b[0m", e)?;
        }
    }
}
