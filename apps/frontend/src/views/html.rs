use std::fmt::Write as _;

use super::{FormState, Page, PageContext, PageRenderer, RenderError, View};
use crate::api_client::JobRole;
use crate::validation::ALLOWED_CV_EXTENSIONS;

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Only `http` and `https` URLs may be placed in an `href`.
fn is_web_url(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("https://") || lower.starts_with("http://")
}

/// Built-in renderer: one shared layout with per-page bodies.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlRenderer;

impl PageRenderer for HtmlRenderer {
    fn render(&self, view: &View) -> Result<String, RenderError> {
        let mut body = String::new();
        render_body(&mut body, view)?;

        let mut html = String::with_capacity(body.len() + 1024);
        write!(
            html,
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
             <title>{}</title>\n<link rel=\"stylesheet\" href=\"/css/output.css\">\n</head>\n<body>\n",
            escape(&view.context.title)
        )?;
        render_nav(&mut html, &view.context)?;
        write!(html, "<main id=\"main-content\">\n{body}</main>\n</body>\n</html>\n")?;
        Ok(html)
    }
}

fn nav_link(out: &mut String, ctx: &PageContext, key: &str, href: &str, label: &str) -> Result<(), RenderError> {
    let current = if ctx.current_page == Some(key) {
        " aria-current=\"page\""
    } else {
        ""
    };
    writeln!(out, "<li><a href=\"{href}\"{current}>{label}</a></li>")?;
    Ok(())
}

fn render_nav(out: &mut String, ctx: &PageContext) -> Result<(), RenderError> {
    out.push_str("<nav aria-label=\"Main\">\n<ul>\n");
    nav_link(out, ctx, "home", "/", "Home")?;
    nav_link(out, ctx, "jobs", "/jobs", "Job Roles")?;
    if ctx.user.is_admin() && ctx.features.admin_dashboard {
        nav_link(out, ctx, "admin", "/admin", "Admin")?;
    }
    if ctx.user.is_authenticated {
        if let Some(email) = &ctx.user.email {
            writeln!(out, "<li class=\"user-email\">{}</li>", escape(email))?;
        }
        out.push_str(
            "<li><form method=\"post\" action=\"/api/logout\"><button type=\"submit\">Logout</button></form></li>\n",
        );
    } else {
        nav_link(out, ctx, "login", "/login", "Login")?;
        nav_link(out, ctx, "register", "/register", "Register")?;
    }
    out.push_str("</ul>\n</nav>\n");
    Ok(())
}

fn render_body(out: &mut String, view: &View) -> Result<(), RenderError> {
    let ctx = &view.context;
    match &view.page {
        Page::Home => {
            out.push_str("<h1>Kainos Job Opportunities</h1>\n<p>Find your dream job with us!</p>\n");
            out.push_str("<p><a href=\"/jobs\">Browse open roles</a></p>\n");
        }
        Page::Jobs { roles } => {
            out.push_str("<h1>Kainos Job Opportunities</h1>\n");
            render_roles_table(out, roles, ctx.features.job_detail_view, false)?;
        }
        Page::JobDetail { role } => render_job_detail(out, ctx, role)?,
        Page::Login { form } => render_credentials_form(out, "Login", "/api/login", form, false)?,
        Page::Register { form } => {
            render_credentials_form(out, "Register", "/api/register", form, true)?
        }
        Page::Error => {
            out.push_str("<h1>Something went wrong</h1>\n");
            out.push_str("<p>An unexpected error occurred. Please try again later.</p>\n");
            out.push_str("<p><a href=\"/\">Return to the home page</a></p>\n");
        }
        Page::LoginFailed => {
            out.push_str("<h1>Login failed</h1>\n");
            out.push_str("<p>Invalid email or password. Please try again.</p>\n");
            out.push_str("<p><a href=\"/login\">Back to login</a></p>\n");
        }
        Page::RegisterFailed => {
            out.push_str("<h1>Registration failed</h1>\n");
            out.push_str("<p>We could not create your account. Please check your details and try again.</p>\n");
            out.push_str("<p><a href=\"/register\">Back to registration</a></p>\n");
        }
        Page::AdminDashboard => {
            out.push_str("<h1>Admin Dashboard</h1>\n<ul class=\"admin-actions\">\n");
            out.push_str("<li><a href=\"/admin/jobs\">Manage job listings</a></li>\n");
            out.push_str("<li><a href=\"/admin/jobs/new\">Create new job</a></li>\n");
            out.push_str("<li><a href=\"/admin/admins/new\">Create admin account</a></li>\n");
            out.push_str("</ul>\n");
        }
        Page::AdminJobs { roles } => {
            out.push_str("<h1>Manage Job Listings</h1>\n");
            render_roles_table(out, roles, true, true)?;
        }
        Page::AdminCreateJob => {
            out.push_str("<h1>Create New Job</h1>\n<form id=\"create-job-form\">\n");
            for (name, label) in [
                ("roleName", "Role name"),
                ("location", "Location"),
                ("capability", "Capability"),
                ("band", "Band"),
                ("closingDate", "Closing date"),
                ("numberOfOpenPositions", "Open positions"),
            ] {
                writeln!(
                    out,
                    "<label for=\"{name}\">{label}</label>\n<input id=\"{name}\" name=\"{name}\" required>"
                )?;
            }
            out.push_str("<label for=\"description\">Description</label>\n<textarea id=\"description\" name=\"description\"></textarea>\n");
            out.push_str("<button type=\"submit\">Create job</button>\n</form>\n");
        }
        Page::AdminCreateAdmin => {
            out.push_str("<h1>Create Admin Account</h1>\n<form id=\"create-admin-form\">\n");
            out.push_str("<label for=\"email\">Email</label>\n<input id=\"email\" name=\"email\" type=\"email\" required>\n");
            out.push_str("<label for=\"password\">Password</label>\n<input id=\"password\" name=\"password\" type=\"password\" required>\n");
            out.push_str("<button type=\"submit\">Create admin</button>\n</form>\n");
        }
    }
    Ok(())
}

fn render_roles_table(
    out: &mut String,
    roles: &[JobRole],
    link_details: bool,
    show_status: bool,
) -> Result<(), RenderError> {
    if roles.is_empty() {
        out.push_str("<p class=\"empty\">There are no job roles available right now.</p>\n");
        return Ok(());
    }

    out.push_str("<table class=\"job-roles\">\n<thead><tr><th>Role</th><th>Location</th><th>Capability</th><th>Band</th><th>Closing date</th>");
    if show_status {
        out.push_str("<th>Status</th>");
    }
    out.push_str("</tr></thead>\n<tbody>\n");

    for role in roles {
        let name = escape(&role.role_name);
        out.push_str("<tr>");
        if link_details {
            write!(out, "<td><a href=\"/job-roles/{}\">{name}</a></td>", role.id)?;
        } else {
            write!(out, "<td>{name}</td>")?;
        }
        write!(
            out,
            "<td>{}</td><td>{}</td><td>{}</td><td>{}</td>",
            escape(&role.location),
            escape(&role.capability),
            escape(&role.band),
            escape(&role.closing_date)
        )?;
        if show_status {
            write!(out, "<td>{}</td>", escape(role.status.as_deref().unwrap_or("")))?;
        }
        out.push_str("</tr>\n");
    }

    out.push_str("</tbody>\n</table>\n");
    Ok(())
}

fn render_job_detail(out: &mut String, ctx: &PageContext, role: &JobRole) -> Result<(), RenderError> {
    writeln!(out, "<h1>{}</h1>", escape(&role.role_name))?;
    out.push_str("<dl class=\"job-summary\">\n");
    for (label, value) in [
        ("Location", role.location.as_str()),
        ("Capability", role.capability.as_str()),
        ("Band", role.band.as_str()),
        ("Closing date", role.closing_date.as_str()),
    ] {
        writeln!(out, "<dt>{label}</dt><dd>{}</dd>", escape(value))?;
    }
    if let Some(positions) = role.number_of_open_positions {
        writeln!(out, "<dt>Open positions</dt><dd>{positions}</dd>")?;
    }
    out.push_str("</dl>\n");

    if let Some(description) = &role.description {
        writeln!(out, "<p class=\"description\">{}</p>", escape(description))?;
    }
    if !role.responsibilities.is_empty() {
        out.push_str("<h2>Responsibilities</h2>\n<ul>\n");
        for item in &role.responsibilities {
            writeln!(out, "<li>{}</li>", escape(item))?;
        }
        out.push_str("</ul>\n");
    }
    if let Some(url) = role.sharepoint_url.as_deref().filter(|url| is_web_url(url)) {
        writeln!(
            out,
            "<p><a href=\"{}\" rel=\"noopener\">Full job specification</a></p>",
            escape(url)
        )?;
    }

    if ctx.features.job_apply_view {
        let accept = ALLOWED_CV_EXTENSIONS
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect::<Vec<_>>()
            .join(",");
        writeln!(
            out,
            "<form id=\"apply-form\" method=\"post\" action=\"/job-roles/{}/apply\" enctype=\"multipart/form-data\">",
            role.id
        )?;
        writeln!(
            out,
            "<label for=\"cv\">Upload your CV</label>\n<input id=\"cv\" name=\"cv\" type=\"file\" accept=\"{accept}\" required>"
        )?;
        out.push_str("<button type=\"submit\">Apply</button>\n</form>\n");
    }
    Ok(())
}

fn render_field_error(out: &mut String, form: &FormState, field: &str) -> Result<(), RenderError> {
    if let Some(message) = form.errors.get(field) {
        writeln!(
            out,
            "<p class=\"field-error\" id=\"{field}-error\">{}</p>",
            escape(message)
        )?;
    }
    Ok(())
}

fn render_credentials_form(
    out: &mut String,
    heading: &str,
    action: &str,
    form: &FormState,
    with_confirmation: bool,
) -> Result<(), RenderError> {
    writeln!(out, "<h1>{heading}</h1>")?;
    if let Some(message) = &form.error_message {
        writeln!(out, "<div class=\"error-summary\" role=\"alert\">{}</div>", escape(message))?;
    }

    writeln!(out, "<form method=\"post\" action=\"{action}\" novalidate>")?;
    writeln!(
        out,
        "<label for=\"email\">Email</label>\n<input id=\"email\" name=\"email\" type=\"email\" value=\"{}\">",
        escape(&form.email)
    )?;
    render_field_error(out, form, "email")?;
    out.push_str("<label for=\"password\">Password</label>\n<input id=\"password\" name=\"password\" type=\"password\">\n");
    render_field_error(out, form, "password")?;
    if with_confirmation {
        out.push_str("<label for=\"confirmPassword\">Confirm password</label>\n<input id=\"confirmPassword\" name=\"confirmPassword\" type=\"password\">\n");
        render_field_error(out, form, "confirmPassword")?;
    }
    writeln!(out, "<button type=\"submit\">{heading}</button>\n</form>")?;
    Ok(())
}
