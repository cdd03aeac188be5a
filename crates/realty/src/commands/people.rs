//! Testimonials and team members from the local dataset.

use tabled::Tabled;

use realty_core::{ContentSource, TeamMember, Testimonial};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct TestimonialRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Rating")]
    rating: String,
    #[tabled(rename = "Quote")]
    content: String,
}

impl From<&Testimonial> for TestimonialRow {
    fn from(t: &Testimonial) -> Self {
        Self {
            name: t.name.clone(),
            role: t.role.clone().unwrap_or_default(),
            rating: t.rating.map(|r| "*".repeat(usize::from(r))).unwrap_or_default(),
            content: t.content.clone(),
        }
    }
}

#[derive(Tabled)]
struct TeamRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Phone")]
    phone: String,
}

impl From<&TeamMember> for TeamRow {
    fn from(m: &TeamMember) -> Self {
        Self {
            name: m.name.clone(),
            role: m.role.clone().unwrap_or_default(),
            email: m.email.clone().unwrap_or_default(),
            phone: m.phone.clone().unwrap_or_default(),
        }
    }
}

pub fn testimonials(source: &ContentSource, global: &GlobalOpts) -> Result<(), CliError> {
    let items = source.testimonials();
    let out = output::render_list(
        &global.output_format(),
        &items,
        |t| TestimonialRow::from(t),
        |t| t.name.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub fn team(source: &ContentSource, global: &GlobalOpts) -> Result<(), CliError> {
    let members = source.team();
    let out = output::render_list(&global.output_format(), &members, |m| TeamRow::from(m), |m| m.name.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
