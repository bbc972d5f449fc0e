//! Command-line interface for the course catalog.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};

use crate::core::{
    Catalog, Course, CourseChangeset, CourseType, DifficultyLevel, EnrollmentStatus, NewCourse,
};
use crate::db::connection::DbPath;
use crate::error::{Error, Result};
use crate::graph::DeletionOutcome;

/// coursecat — prerequisite-aware course catalog
#[derive(Parser)]
#[command(name = "coursecat")]
#[command(about = "A course catalog with a prerequisite DAG", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new catalog in the current directory
    Init,

    /// Add a new course
    Add {
        /// Course name
        name: String,
        /// Price
        #[arg(long)]
        price: f64,
        /// Duration in weeks
        #[arg(long)]
        duration: i64,
        /// Course type: diploma, degree, or certificate
        #[arg(long = "type")]
        course_type: String,
        /// Difficulty: beginner, intermediate, or advanced
        #[arg(long)]
        difficulty: String,
        /// URL for course notes
        #[arg(long)]
        notes_url: Option<String>,
        /// URL for course videos
        #[arg(long)]
        video_url: Option<String>,
        /// Prerequisite course ID (repeatable)
        #[arg(long = "prereq")]
        prereqs: Vec<i64>,
    },

    /// Edit a course
    Edit {
        /// Course ID
        id: i64,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New price
        #[arg(long)]
        price: Option<f64>,
        /// New duration in weeks
        #[arg(long)]
        duration: Option<i64>,
        /// New course type
        #[arg(long = "type")]
        course_type: Option<String>,
        /// New difficulty
        #[arg(long)]
        difficulty: Option<String>,
        /// New notes URL
        #[arg(long)]
        notes_url: Option<String>,
        /// New videos URL
        #[arg(long)]
        video_url: Option<String>,
        /// Replace the prerequisite set with these IDs (repeatable)
        #[arg(long = "prereq")]
        prereqs: Vec<i64>,
        /// Remove all prerequisites
        #[arg(long, conflicts_with = "prereqs")]
        clear_prereqs: bool,
    },

    /// Remove a course
    Rm {
        /// Course ID
        id: i64,
        /// Remove even if other courses require it
        #[arg(long)]
        force: bool,
        /// Redirect dependents to this course ID (implies --force)
        #[arg(long)]
        replace_with: Option<i64>,
    },

    /// Show detailed information about a course
    Show {
        /// Course ID
        id: i64,
    },

    /// List courses
    List {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Register a student
    Student {
        /// Student name
        name: String,
    },

    /// Enroll a student in a course
    Enroll {
        /// Student ID
        student: i64,
        /// Course ID
        course: i64,
    },

    /// Record a score for an enrolled student
    Grade {
        /// Student ID
        student: i64,
        /// Course ID
        course: i64,
        /// Score, 0 to 100
        score: f64,
        /// Resulting status: pending or completed
        #[arg(long, default_value = "completed")]
        status: String,
    },

    /// Show a student's enrollment records
    Transcript {
        /// Student ID
        student: i64,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn open_catalog() -> Result<Catalog> {
    let path = DbPath::default_path();
    if !path.exists() {
        return Err(Error::NotInitialized);
    }
    Catalog::open(path.as_path())
}

fn format_datetime(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn print_course_line(course: &Course) {
    println!(
        "[#{}] {} — {} / {} ({} wk, ${:.2})",
        course.id, course.name, course.course_type, course.difficulty, course.duration, course.price
    );
}

fn print_course_detail(catalog: &Catalog, course: &Course) -> Result<()> {
    println!("[#{}] {}", course.id, course.name);
    println!("  Type:       {}", course.course_type);
    println!("  Difficulty: {}", course.difficulty);
    println!("  Price:      ${:.2}", course.price);
    println!("  Duration:   {} weeks", course.duration);
    if let Some(url) = &course.notes_url {
        println!("  Notes:      {}", url);
    }
    if let Some(url) = &course.video_url {
        println!("  Videos:     {}", url);
    }
    println!("  Created:    {}", format_datetime(&course.created_at));

    let prereqs = catalog.prerequisites_of(course.id)?;
    if prereqs.is_empty() {
        println!("  Requires:   (none)");
    } else {
        println!("  Requires:");
        for id in prereqs {
            let prereq = catalog.course(id)?;
            println!("    - [#{}] {}", prereq.id, prereq.name);
        }
    }

    let dependents = catalog.dependents_of(course.id)?;
    if !dependents.is_empty() {
        println!("  Required by:");
        for id in dependents {
            let dep = catalog.course(id)?;
            println!("    - [#{}] {}", dep.id, dep.name);
        }
    }
    Ok(())
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            let path = DbPath::default_path();
            if path.exists() {
                return Err(Error::AlreadyInitialized);
            }
            Catalog::init(path.as_path())?;
            println!("Initialized catalog in {}", path.as_path().display());
            Ok(())
        }

        Commands::Add {
            name,
            price,
            duration,
            course_type,
            difficulty,
            notes_url,
            video_url,
            prereqs,
        } => {
            let mut catalog = open_catalog()?;
            let new = NewCourse {
                name,
                price,
                duration,
                course_type: CourseType::parse(&course_type)?,
                difficulty: DifficultyLevel::parse(&difficulty)?,
                notes_url,
                video_url,
            };
            let prereqs: BTreeSet<i64> = prereqs.into_iter().collect();
            let course = catalog.add_course(&new, &prereqs)?;
            println!("Created course #{}: {}", course.id, course.name);
            Ok(())
        }

        Commands::Edit {
            id,
            name,
            price,
            duration,
            course_type,
            difficulty,
            notes_url,
            video_url,
            prereqs,
            clear_prereqs,
        } => {
            let mut catalog = open_catalog()?;
            let changeset = CourseChangeset {
                name,
                price,
                duration,
                course_type: course_type.as_deref().map(CourseType::parse).transpose()?,
                difficulty: difficulty
                    .as_deref()
                    .map(DifficultyLevel::parse)
                    .transpose()?,
                notes_url,
                video_url,
            };
            let new_prereqs: Option<BTreeSet<i64>> = if clear_prereqs {
                Some(BTreeSet::new())
            } else if prereqs.is_empty() {
                None
            } else {
                Some(prereqs.into_iter().collect())
            };
            catalog.update_course(id, &changeset, new_prereqs.as_ref())?;
            println!("Updated course #{}", id);
            Ok(())
        }

        Commands::Rm {
            id,
            force,
            replace_with,
        } => {
            let mut catalog = open_catalog()?;
            let force = force || replace_with.is_some();
            match catalog.remove_course(id, force, replace_with)? {
                DeletionOutcome::Deleted => {
                    println!("Removed course #{}", id);
                }
                DeletionOutcome::Cascaded { dependents } => {
                    println!(
                        "Removed course #{} and dropped it from {} dependent course(s)",
                        id,
                        dependents.len()
                    );
                }
                DeletionOutcome::Redirected {
                    replacement,
                    dependents,
                } => {
                    println!(
                        "Removed course #{}; {} dependent course(s) now require #{}",
                        id,
                        dependents.len(),
                        replacement
                    );
                }
            }
            Ok(())
        }

        Commands::Show { id } => {
            let catalog = open_catalog()?;
            let course = catalog.course(id)?;
            print_course_detail(&catalog, &course)
        }

        Commands::List { json } => {
            let catalog = open_catalog()?;
            let courses = catalog.courses()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&courses)?);
            } else {
                for course in &courses {
                    print_course_line(course);
                }
                println!("\n{} course(s)", courses.len());
            }
            Ok(())
        }

        Commands::Student { name } => {
            let mut catalog = open_catalog()?;
            let id = catalog.add_student(&name)?;
            println!("Registered student #{}: {}", id, name);
            Ok(())
        }

        Commands::Enroll { student, course } => {
            let mut catalog = open_catalog()?;
            let record = catalog.enroll(student, course)?;
            println!(
                "Enrolled student #{} in course #{} ({})",
                student, course, record.status
            );
            Ok(())
        }

        Commands::Grade {
            student,
            course,
            score,
            status,
        } => {
            let mut catalog = open_catalog()?;
            let status = EnrollmentStatus::parse(&status)?;
            catalog.evaluate(student, course, score, status)?;
            println!(
                "Recorded {:.1} for student #{} in course #{} ({})",
                score, student, course, status
            );
            Ok(())
        }

        Commands::Transcript { student, json } => {
            let catalog = open_catalog()?;
            let records = catalog.transcript(student)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                println!("Transcript for student #{}:", student);
                for record in &records {
                    let course = catalog.course(record.course_id)?;
                    let score = record
                        .score
                        .map(|s| format!("{:.1}", s))
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "  [#{}] {} — {} (score: {}, enrolled {})",
                        course.id,
                        course.name,
                        record.status,
                        score,
                        format_datetime(&record.enrolled_at)
                    );
                }
                if records.is_empty() {
                    println!("  (no enrollments)");
                }
            }
            Ok(())
        }
    }
}
