//! One function per screen. Each fetches what it shows, writes it to `out`
//! and keeps nothing afterwards.

use std::io::Write;

use chrono::{DateTime, Utc};
use shared::Member;

use crate::{
    api::{ApiClient, ClientError},
    form::MemberForm,
};

/// Changes requested on the edit screen; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct MemberChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub membership_type: Option<String>,
    pub active: Option<bool>,
}

impl MemberChanges {
    fn apply(self, form: &mut MemberForm) {
        if let Some(name) = self.name {
            form.name = name;
        }
        if let Some(email) = self.email {
            form.email = email;
        }
        if let Some(phone) = self.phone {
            form.phone = phone;
        }
        if let Some(membership_type) = self.membership_type {
            form.membership_type = membership_type;
        }
        if let Some(active) = self.active {
            form.active = active;
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Output(#[from] std::io::Error),
}

pub type ViewResult = Result<(), ViewError>;

fn status_label(active: bool) -> &'static str {
    if active {
        "Active"
    } else {
        "Inactive"
    }
}

fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Case-insensitive match on name, email or membership type.
pub fn matches_search(member: &Member, term: &str) -> bool {
    let term = term.to_lowercase();
    member.name.to_lowercase().contains(&term)
        || member.email.to_lowercase().contains(&term)
        || member.membership_type.as_str().to_lowercase().contains(&term)
}

pub fn render_list(members: &[Member], search: Option<&str>) -> String {
    let shown = members
        .iter()
        .filter(|member| search.map_or(true, |term| matches_search(member, term)))
        .collect::<Vec<_>>();

    if shown.is_empty() {
        return match search {
            Some(_) => "No members found. Try a different search term.\n".to_string(),
            None => "No members found. Add a member with `gym add`.\n".to_string(),
        };
    }

    let mut table = format!(
        "{:<5} {:<24} {:<30} {:<15} {:<10} {}\n",
        "ID", "Name", "Email", "Phone", "Membership", "Status"
    );
    for member in shown {
        table.push_str(&format!(
            "{:<5} {:<24} {:<30} {:<15} {:<10} {}\n",
            member.id,
            member.name,
            member.email,
            member.phone,
            member.membership_type,
            status_label(member.active)
        ));
    }
    table
}

pub fn render_detail(member: &Member) -> String {
    format!(
        "Member Details: {name} (#{id})\n\
         \n\
         Personal Information\n\
         \x20 Email:           {email}\n\
         \x20 Phone:           {phone}\n\
         \x20 Status:          {status}\n\
         \n\
         Membership Information\n\
         \x20 Membership Type: {membership_type}\n\
         \x20 Joined:          {joined}\n\
         \x20 Member Since:    {created}\n\
         \x20 Last Updated:    {updated}\n",
        name = member.name,
        id = member.id,
        email = member.email,
        phone = member.phone,
        status = status_label(member.active),
        membership_type = member.membership_type,
        joined = format_date(&member.joining_date),
        created = format_date(&member.created_at),
        updated = format_date(&member.updated_at),
    )
}

#[tracing::instrument(skip(api, out))]
pub async fn list(api: &ApiClient, search: Option<&str>, out: &mut impl Write) -> ViewResult {
    writeln!(out, "Loading members...")?;
    let members = api.list().await?;
    write!(out, "{}", render_list(&members, search))?;
    Ok(())
}

#[tracing::instrument(skip(api, out))]
pub async fn show(api: &ApiClient, id: i64, out: &mut impl Write) -> ViewResult {
    writeln!(out, "Loading member details...")?;
    match api.get(id).await {
        Ok(member) => write!(out, "{}", render_detail(&member))?,
        Err(err) if err.is_not_found() => {
            writeln!(out, "Member Not Found")?;
            writeln!(
                out,
                "The member you're looking for doesn't exist or has been removed."
            )?;
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

#[tracing::instrument(skip(api, out))]
pub async fn add(api: &ApiClient, form: MemberForm, out: &mut impl Write) -> ViewResult {
    form.validate().map_err(ClientError::Invalid)?;
    let member = api.create(&form).await?;
    writeln!(out, "Member added successfully! (id {})", member.id)?;
    Ok(())
}

/// Loads the stored record into the form, applies `changes`, then submits
/// the whole form.
#[tracing::instrument(skip(api, out))]
pub async fn edit(
    api: &ApiClient,
    id: i64,
    changes: MemberChanges,
    out: &mut impl Write,
) -> ViewResult {
    writeln!(out, "Loading member data...")?;
    let current = api.get(id).await?;

    let mut form = MemberForm::from(&current);
    changes.apply(&mut form);
    form.validate().map_err(ClientError::Invalid)?;

    let member = api.update(id, &form).await?;
    writeln!(out, "Member updated successfully!")?;
    write!(out, "{}", render_detail(&member))?;
    Ok(())
}

#[tracing::instrument(skip(api, out))]
pub async fn delete(api: &ApiClient, id: i64, out: &mut impl Write) -> ViewResult {
    let member = api.delete(id).await?;
    writeln!(out, "Member deleted successfully: {} <{}>", member.name, member.email)?;
    Ok(())
}
