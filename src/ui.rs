use crate::models::{DailyBucket, DashboardResponse};

pub fn render_index(dashboard: &DashboardResponse) -> String {
    let latest = &dashboard.latest;
    let (days, clock, message, last_order) = match (&latest.latest, &latest.elapsed) {
        (Some(order), Some(elapsed)) => (
            elapsed.days.to_string(),
            elapsed.clock(),
            latest.message.clone().unwrap_or_default(),
            format!(
                "{} <span class=\"dot\">&middot;</span> <span class=\"spent\">${:.2}</span>",
                escape_html(&order.restaurant),
                order.total
            ),
        ),
        _ => (
            "0".to_string(),
            "00:00:00".to_string(),
            "no orders on record. suspiciously clean.".to_string(),
            "none".to_string(),
        ),
    };

    let recent = &dashboard.last_30_days;
    let top = dashboard
        .top_restaurants
        .iter()
        .map(|entry| escape_html(&entry.restaurant))
        .collect::<Vec<_>>()
        .join(" &middot; ");
    let year_tabs = dashboard
        .years
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            format!(
                "<button class=\"tab{}\" type=\"button\" data-year=\"{year}\">{year}</button>",
                if index == 0 { " active" } else { "" },
                year = entry.year
            )
        })
        .collect::<String>();

    let heatmap = render_heatmap(&recent.days);
    let orders = recent.summary.total_orders.to_string();
    let active_days = recent.summary.days_with_orders.to_string();
    let clean_days = recent.summary.clean_days.to_string();
    let streak = recent.summary.streak.to_string();
    let success = dashboard.all_time.success_rate.to_string();
    let message = escape_html(&message);
    let updated = escape_html(dashboard.last_updated.as_deref().unwrap_or("never"));

    fill_template(
        INDEX_HTML,
        &[
            ("DAYS", &days),
            ("CLOCK", &clock),
            ("MESSAGE", &message),
            ("LAST_ORDER", &last_order),
            ("HEATMAP", &heatmap),
            ("ORDERS", &orders),
            ("ACTIVE_DAYS", &active_days),
            ("CLEAN_DAYS", &clean_days),
            ("STREAK", &streak),
            ("SUCCESS", &success),
            ("TOP", if top.is_empty() { "none yet" } else { &top }),
            ("YEAR_TABS", &year_tabs),
            ("UPDATED", &updated),
        ],
    )
}

/// Substitutes `{{KEY}}` markers in one pass over the template, so inserted
/// values are never scanned for further markers. Unknown keys are kept as-is.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + 4096);
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            out.push_str(&rest[open..]);
            return out;
        };
        let key = &after[..close];
        match values.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[open..open + 2 + close + 2]),
        }
        rest = &after[close + 2..];
    }
    out.push_str(rest);
    out
}

fn render_heatmap(days: &[DailyBucket]) -> String {
    let last = days.len().saturating_sub(1);
    days.iter()
        .enumerate()
        .map(|(index, day)| {
            format!(
                "<div class=\"cell l{}{}\" title=\"{}: {} order{}\"></div>",
                day.level,
                if index == last { " today" } else { "" },
                day.date,
                day.count,
                if day.count == 1 { "" } else { "s" }
            )
        })
        .collect()
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Delivery Recovery</title>
  <meta name="description" content="Delivery recovery tracker - one order at a time" />
  <style>
    :root {
      --bg: #09090b;
      --ink: #f4f4f5;
      --muted: #71717a;
      --faint: #3f3f46;
      --accent: #ef4444;
      --clean: #34d399;
      --l0: #18181b;
      --l1: rgba(127, 29, 29, 0.6);
      --l2: rgba(185, 28, 28, 0.7);
      --l3: #ef4444;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(ellipse at center, transparent 0%, transparent 40%, rgba(0, 0, 0, 0.7) 100%), var(--bg);
      color: var(--ink);
      font-family: ui-monospace, "SF Mono", Menlo, monospace;
      display: flex;
      flex-direction: column;
      align-items: center;
      padding: 32px 16px 48px;
      gap: 28px;
    }

    header {
      text-align: center;
    }

    h1 {
      margin: 0;
      font-size: 0.85rem;
      letter-spacing: 0.3em;
      text-transform: uppercase;
      color: #a1a1aa;
      font-weight: 500;
    }

    .tagline {
      margin: 4px 0 0;
      font-size: 0.65rem;
      letter-spacing: 0.2em;
      color: #52525b;
      font-style: italic;
    }

    .timer {
      text-align: center;
    }

    .days {
      font-size: clamp(3rem, 10vw, 6rem);
      font-weight: 700;
    }

    .days small {
      font-size: 1.1rem;
      color: var(--muted);
      letter-spacing: 0.2em;
      text-transform: uppercase;
      margin-left: 12px;
    }

    .clock {
      font-size: clamp(4rem, 16vw, 12rem);
      font-weight: 700;
      line-height: 1;
      letter-spacing: -0.02em;
    }

    .message {
      color: #a1a1aa;
      font-style: italic;
      font-size: 1.2rem;
      text-align: center;
      max-width: 36rem;
    }

    .last {
      color: #52525b;
      font-size: 0.8rem;
      letter-spacing: 0.1em;
      text-transform: uppercase;
    }

    .last .spent {
      color: rgba(248, 113, 113, 0.7);
    }

    .heatmap {
      display: flex;
      flex-wrap: wrap;
      justify-content: center;
      gap: 5px;
      max-width: 28rem;
    }

    .cell {
      width: 14px;
      height: 14px;
      border-radius: 3px;
    }

    .l0 { background: var(--l0); }
    .l1 { background: var(--l1); }
    .l2 { background: var(--l2); }
    .l3 { background: var(--l3); }
    .empty { background: transparent; }

    .cell.today {
      outline: 1px solid #52525b;
    }

    .stats {
      display: flex;
      gap: 28px;
      justify-content: center;
      flex-wrap: wrap;
    }

    .stat strong {
      font-size: 1.5rem;
    }

    .stat span {
      margin-left: 8px;
      font-size: 0.7rem;
      color: #52525b;
      letter-spacing: 0.1em;
      text-transform: uppercase;
    }

    .orders strong { color: #f87171; }
    .clean strong { color: var(--clean); }

    .top {
      font-size: 0.75rem;
      color: var(--muted);
    }

    .year {
      display: grid;
      gap: 12px;
      justify-items: center;
    }

    .tabs {
      display: flex;
      gap: 6px;
    }

    .tab {
      background: transparent;
      border: 1px solid var(--faint);
      border-radius: 999px;
      color: var(--muted);
      padding: 4px 12px;
      font: inherit;
      cursor: pointer;
    }

    .tab.active {
      color: var(--ink);
      border-color: var(--accent);
    }

    .calendar {
      display: grid;
      grid-auto-flow: column;
      grid-template-rows: repeat(7, 10px);
      gap: 3px;
      overflow-x: auto;
      max-width: 100%;
    }

    .calendar .cell {
      width: 10px;
      height: 10px;
      border-radius: 2px;
    }

    .months {
      display: grid;
      gap: 3px;
      font-size: 0.6rem;
      color: #52525b;
    }

    .footnote {
      font-size: 0.65rem;
      color: #3f3f46;
    }
  </style>
</head>
<body>
  <header>
    <h1>delivery recovery</h1>
    <p class="tagline">one order at a time</p>
  </header>

  <main class="timer">
    <div class="days"><span id="days">{{DAYS}}</span><small>days</small></div>
    <div class="clock" id="clock">{{CLOCK}}</div>
    <p class="message" id="message">&ldquo;{{MESSAGE}}&rdquo;</p>
    <p class="last">last relapse: {{LAST_ORDER}}</p>
  </main>

  <section>
    <div class="heatmap">{{HEATMAP}}</div>
  </section>

  <section class="stats">
    <div class="stat orders"><strong>{{ORDERS}}</strong><span>orders</span></div>
    <div class="stat"><strong>{{ACTIVE_DAYS}}</strong><span>days</span></div>
    <div class="stat clean"><strong>{{CLEAN_DAYS}}</strong><span>clean</span></div>
    <div class="stat clean"><strong>{{STREAK}}</strong><span>streak</span></div>
    <div class="stat"><strong>{{SUCCESS}}%</strong><span>all-time clean</span></div>
  </section>

  <p class="top">top enablers: {{TOP}}</p>

  <section class="year">
    <div class="tabs" role="tablist">{{YEAR_TABS}}</div>
    <div class="months" id="months"></div>
    <div class="calendar" id="calendar"></div>
    <p class="top" id="year-summary"></p>
  </section>

  <p class="footnote">data last updated {{UPDATED}}</p>

  <script>
    const daysEl = document.getElementById('days');
    const clockEl = document.getElementById('clock');
    const messageEl = document.getElementById('message');
    const calendarEl = document.getElementById('calendar');
    const monthsEl = document.getElementById('months');
    const yearSummaryEl = document.getElementById('year-summary');
    const tabs = Array.from(document.querySelectorAll('.tab'));

    const refreshElapsed = async () => {
      const res = await fetch('/api/elapsed');
      if (!res.ok) {
        return;
      }
      const data = await res.json();
      if (!data.elapsed) {
        return;
      }
      daysEl.textContent = data.elapsed.days;
      clockEl.textContent = data.clock;
      messageEl.textContent = `“${data.message}”`;
    };

    const timer = setInterval(() => {
      refreshElapsed().catch(() => {});
    }, 1000);
    window.addEventListener('pagehide', () => clearInterval(timer));

    const renderYear = (year) => {
      const columns = year.grid.weeks.length;
      calendarEl.innerHTML = year.grid.weeks
        .map((week) => week
          .map((cell) => cell.kind === 'day'
            ? `<div class="cell l${cell.level}" title="${cell.date}: ${cell.count}"></div>`
            : '<div class="cell empty"></div>')
          .join(''))
        .join('');
      monthsEl.style.gridTemplateColumns = `repeat(${columns}, 10px)`;
      monthsEl.innerHTML = year.grid.months
        .map((m) => `<span style="grid-column: ${m.column + 1} / span ${m.span}">${m.label}</span>`)
        .join('');
      const names = year.top_restaurants.map((r) => `${r.restaurant} (${r.count})`).join(' · ');
      yearSummaryEl.textContent =
        `${year.summary.total_orders} orders · ${year.summary.success_rate}% clean · ${names || 'no enablers'}`;
    };

    const loadYear = async (year) => {
      const res = await fetch(`/api/years/${year}`);
      if (!res.ok) {
        throw new Error('Unable to load year');
      }
      renderYear(await res.json());
    };

    tabs.forEach((button) => {
      button.addEventListener('click', () => {
        tabs.forEach((tab) => tab.classList.toggle('active', tab === button));
        loadYear(button.dataset.year).catch(() => {});
      });
    });

    if (tabs.length) {
      loadYear(tabs[0].dataset.year).catch(() => {});
    }
  </script>
</body>
</html>
"#;
