use std::io::{self, Stdout, Write};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};

pub fn reset_screen(stdout: &mut Stdout, message: &str) {
    clear_screen(stdout);

    println!("----------------------------------------------------------------------");
    println!("{}", message);
    println!("----------------------------------------------------------------------");
}

pub fn clear_screen(stdout: &mut Stdout) {
    // a terminal that refuses escape codes just keeps scrolling
    let _ = execute!(stdout, Clear(ClearType::All), MoveTo(0, 0));
}

pub fn read_line() -> String {
    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return String::new();
    }
    input.trim().to_string()
}

pub fn end_of_run() {
    println!("\nPress Enter to continue...");
    read_line();
}

pub fn user_choice(options: Vec<&str>, message: &str) -> usize {
    let mut stdout = io::stdout();

    reset_screen(&mut stdout, &format!("Type the number of your selection, Enter to Select: \n{}", message));

    println!("Select an option:");
    for (i, option) in options.iter().enumerate() {
        println!("{}: {}", i + 1, option);
    }

    print!("Enter your choice: ");
    let _ = stdout.flush();

    match read_line().parse::<usize>() {
        Ok(num) if num > 0 && num <= options.len() => num - 1,
        _ => {
            println!("Invalid input, defaulting to option 1.");
            0
        }
    }
}
