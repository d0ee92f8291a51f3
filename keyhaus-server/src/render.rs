// keyhaus-server/src/render.rs
//
// Inline HTML, same approach as the OAuth pages axum services usually
// hand back. Three screens do not justify a template engine.

use std::collections::HashSet;

use keyhaus_common::models::{Category, LeaderboardEntry, Reward, User};

pub fn esc(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} - keyhaus</title>
<style>
  body {{ font-family: sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; }}
  .flash {{ background: #fde8e8; border: 1px solid #e0b4b4; padding: .75rem 1rem; margin-bottom: 1rem; }}
  .reward {{ border: 1px solid #ddd; padding: 1rem; margin: .5rem 0; }}
  .reward.redeemed {{ opacity: .6; }}
  .categories a {{ margin-right: .75rem; }}
  table {{ border-collapse: collapse; }}
  td, th {{ border: 1px solid #ddd; padding: .4rem .8rem; }}
  .avatar {{ height: 32px; width: 32px; border-radius: 50%; vertical-align: middle; }}
</style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = esc(title),
        body = body,
    )
}

fn leaderboard_table(entries: &[LeaderboardEntry]) -> String {
    if entries.is_empty() {
        return "<p>No winners yet.</p>".to_string();
    }

    let mut rows = String::new();
    for entry in entries {
        rows.push_str(&format!(
            "<tr><td>#{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            entry.position,
            esc(&entry.username),
            esc(&entry.reward_won),
            entry.date_won,
        ));
    }

    format!(
        "<table>\n<tr><th>Place</th><th>Winner</th><th>Prize</th><th>Date</th></tr>\n{rows}</table>"
    )
}

pub fn landing_page(
    leaderboard: &[LeaderboardEntry],
    flash: Option<&str>,
    logged_in: bool,
    login_enabled: bool,
) -> String {
    let flash_html = flash
        .map(|msg| format!(r#"<div class="flash">{}</div>"#, esc(msg)))
        .unwrap_or_default();

    let action = if logged_in {
        r#"<p><a href="/dashboard">Go to your dashboard</a></p>"#.to_string()
    } else if login_enabled {
        r#"<p><a href="/auth/login">Log in with Discord</a></p>"#.to_string()
    } else {
        "<p>Login is currently unavailable.</p>".to_string()
    };

    let body = format!(
        "{flash_html}\n<h1>keyhaus</h1>\n<p>Spend your keys on rewards.</p>\n{action}\n<h2>Past winners</h2>\n{}",
        leaderboard_table(leaderboard),
    );
    page("Welcome", &body)
}

pub fn dashboard_page(
    user: &User,
    categories: &[Category],
    selected: Option<&Category>,
    rewards: &[Reward],
    redeemed: &HashSet<i64>,
    leaderboard: &[LeaderboardEntry],
) -> String {
    let avatar = user
        .avatar_url
        .as_deref()
        .map(|url| format!(r#"<img class="avatar" src="{}" alt="">"#, esc(url)))
        .unwrap_or_default();

    let mut category_links = String::from(r#"<a href="/dashboard">All</a>"#);
    for category in categories {
        let marker = if selected.is_some_and(|s| s.category_id == category.category_id) {
            "<strong>"
        } else {
            ""
        };
        let close = if marker.is_empty() { "" } else { "</strong>" };
        category_links.push_str(&format!(
            r#" <a href="/dashboard?category={}">{marker}{}{close}</a>"#,
            esc(&category.slug),
            esc(&category.name),
        ));
    }

    let mut reward_items = String::new();
    for reward in rewards {
        let image = reward
            .image_url
            .as_deref()
            .map(|url| format!(r#"<img src="{}" alt="" height="64"> "#, esc(url)))
            .unwrap_or_default();

        if redeemed.contains(&reward.reward_id) {
            reward_items.push_str(&format!(
                r#"<div class="reward redeemed">{image}<strong>{}</strong> - {} keys - already redeemed</div>
"#,
                esc(&reward.name),
                reward.key_cost,
            ));
        } else {
            reward_items.push_str(&format!(
                r#"<div class="reward">{image}<strong>{}</strong> - {} keys
  <button onclick="redeem({}, this)">Redeem</button></div>
"#,
                esc(&reward.name),
                reward.key_cost,
                reward.reward_id,
            ));
        }
    }
    if rewards.is_empty() {
        reward_items = "<p>No rewards available right now.</p>".to_string();
    }

    let body = format!(
        r#"<p>{avatar} <strong>{username}</strong> - <span id="balance">{balance}</span> keys - <a href="/logout">Log out</a></p>
<h1>Rewards</h1>
<div class="categories">{category_links}</div>
{reward_items}
<h2>Past winners</h2>
{leaderboard}
<script>
async function redeem(rewardId, button) {{
  button.disabled = true;
  const resp = await fetch('/api/redeem/' + rewardId, {{ method: 'POST' }});
  const data = await resp.json();
  if (data.success) {{
    document.getElementById('balance').textContent = data.new_balance;
    button.closest('.reward').classList.add('redeemed');
    button.remove();
  }} else {{
    alert(data.error);
    button.disabled = false;
  }}
}}
</script>"#,
        username = esc(&user.username),
        balance = user.key_balance,
        leaderboard = leaderboard_table(leaderboard),
    );
    page("Dashboard", &body)
}

pub fn error_page() -> String {
    page(
        "Error",
        "<h1>Something went wrong</h1><p>Please try again in a moment.</p>",
    )
}
