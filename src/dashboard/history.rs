//! The month-grouped transaction history shown on the dashboard and profile pages.

use maud::{Markup, html};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    endpoints::{self, format_endpoint},
    html::{BUTTON_DELETE_STYLE, CARD_STYLE, EXPENSE_STYLE, INCOME_STYLE, LINK_STYLE, format_amount},
    ledger::MonthGroup,
    redirect::{build_redirect_param, with_redirect_param},
    transaction::{Transaction, TransactionType},
};

/// The max number of graphemes of a note to show in the history before
/// truncating and displaying ellipses.
const MAX_NOTE_GRAPHEMES: usize = 32;

pub(crate) fn amount_style(type_: TransactionType) -> &'static str {
    match type_ {
        TransactionType::Income => INCOME_STYLE,
        TransactionType::Expense => EXPENSE_STYLE,
    }
}

/// Render `groups` as a list of months, each with its subtotals and transactions.
///
/// Edit and delete actions send the user back to `redirect_url` afterwards.
pub(crate) fn history_view(groups: &[MonthGroup<'_>], redirect_url: &str) -> Markup {
    let redirect_param = build_redirect_param(redirect_url);

    html! {
        section id="history" class="w-full space-y-6"
        {
            h2 class="text-xl font-bold" { "History" }

            @if groups.is_empty() {
                p
                    data-empty-state="true"
                    class="text-center text-gray-500 dark:text-gray-400"
                {
                    "History is empty"
                }
            }

            @for group in groups {
                div class=(CARD_STYLE) data-month=(group.month.as_query_value())
                {
                    header class="flex flex-wrap justify-between items-baseline gap-2 pb-2 border-b border-gray-200 dark:border-gray-700"
                    {
                        h3 class="text-lg font-semibold" { (group.month) }

                        div class="flex gap-4 text-sm"
                        {
                            span class=(INCOME_STYLE) { "Income: " (format_amount(group.totals.income)) }
                            span class=(EXPENSE_STYLE) { "Expenses: " (format_amount(group.totals.expenses)) }
                        }
                    }

                    ul class="divide-y divide-gray-200 dark:divide-gray-700"
                    {
                        @for transaction in &group.transactions {
                            (history_row_view(transaction, redirect_param.as_deref()))
                        }
                    }
                }
            }
        }
    }
}

fn history_row_view(transaction: &Transaction, redirect_param: Option<&str>) -> Markup {
    let (note, tooltip) = format_note(&transaction.note);
    let detail_url = format_endpoint(endpoints::TRANSACTION_VIEW, transaction.id);
    let edit_url = with_redirect_param(
        format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id),
        redirect_param,
    );
    let delete_url = with_redirect_param(
        format_endpoint(endpoints::TRANSACTION_API, transaction.id),
        redirect_param,
    );

    html! {
        li class="flex items-center justify-between gap-3 py-3" data-transaction-row="true"
        {
            div class="min-w-0 flex-1"
            {
                p class="truncate font-medium" title=[tooltip] { (note) }
                p class="text-sm text-gray-500 dark:text-gray-400"
                {
                    time datetime=(transaction.date) { (transaction.date) }

                    @if let Some(ref category) = transaction.category {
                        " · " (category.name)
                    }
                }
            }

            span class={ "shrink-0 tabular-nums " (amount_style(transaction.type_)) }
            {
                (format_amount(transaction.amount))
            }

            div class="flex shrink-0 gap-3 text-sm"
            {
                a href=(detail_url) class=(LINK_STYLE) { "Details" }
                a href=(edit_url) class=(LINK_STYLE) { "Edit" }
                button
                    hx-delete=(delete_url)
                    hx-confirm="Are you sure you want to delete this transaction? This cannot be undone."
                    hx-target-error="#alert-container"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete"
                }
            }
        }
    }
}

/// The note to display and, if it had to be shortened, the full note for a tooltip.
fn format_note(note: &str) -> (String, Option<&str>) {
    if note.trim().is_empty() {
        return ("No note".to_owned(), None);
    }

    if note.graphemes(true).count() <= MAX_NOTE_GRAPHEMES {
        (note.to_owned(), None)
    } else {
        let truncated: String = note.graphemes(true).take(MAX_NOTE_GRAPHEMES - 3).collect();
        (truncated + "...", Some(note))
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        ledger::{
            group_by_month,
            test_utils::{expense, income},
        },
        test_utils::assert_valid_html,
    };

    use super::{MAX_NOTE_GRAPHEMES, format_note, history_view};

    #[test]
    fn empty_history_shows_message() {
        let html = Html::parse_fragment(&history_view(&[], "/dashboard").into_string());

        assert_valid_html(&html);
        let message = html
            .select(&Selector::parse("[data-empty-state]").unwrap())
            .next()
            .expect("No empty state found");
        assert_eq!(message.text().collect::<String>().trim(), "History is empty");
    }

    #[test]
    fn months_render_in_group_order_with_subtotals() {
        let transactions = [
            income(1, 50.0, date!(2024 - 01 - 10), "Salary"),
            expense(2, 20.0, date!(2024 - 01 - 15), "Food"),
            expense(3, 5.5, date!(2024 - 02 - 01), "Food"),
        ];
        let groups = group_by_month(&transactions);

        let html = Html::parse_fragment(&history_view(&groups, "/dashboard").into_string());

        assert_valid_html(&html);
        let headings: Vec<String> = html
            .select(&Selector::parse("h3").unwrap())
            .map(|heading| heading.text().collect())
            .collect();
        assert_eq!(headings, ["February 2024", "January 2024"]);

        let january = html
            .select(&Selector::parse("[data-month='2024-01']").unwrap())
            .next()
            .expect("No January group");
        let text: String = january.text().collect();
        assert!(text.contains("Income: 50.00"), "got {text}");
        assert!(text.contains("Expenses: 20.00"), "got {text}");
        assert_eq!(
            january
                .select(&Selector::parse("[data-transaction-row]").unwrap())
                .count(),
            2
        );
    }

    #[test]
    fn actions_carry_redirect_url() {
        let transactions = [expense(7, 1.0, date!(2024 - 03 - 02), "Food")];
        let groups = group_by_month(&transactions);

        let html = Html::parse_fragment(&history_view(&groups, "/dashboard?type=expense").into_string());

        let button = html
            .select(&Selector::parse("button[hx-delete]").unwrap())
            .next()
            .expect("No delete button");
        assert_eq!(
            button.value().attr("hx-delete"),
            Some("/api/transactions/7?redirect_url=%2Fdashboard%3Ftype%3Dexpense")
        );
        let edit_link = html
            .select(&Selector::parse("a[href^='/transactions/7/edit']").unwrap())
            .next();
        assert!(edit_link.is_some(), "No edit link found");
    }

    #[test]
    fn blank_notes_are_replaced() {
        assert_eq!(format_note(""), ("No note".to_owned(), None));
        assert_eq!(format_note("  "), ("No note".to_owned(), None));
    }

    #[test]
    fn long_notes_are_truncated_on_graphemes() {
        let note = "👍🏽".repeat(MAX_NOTE_GRAPHEMES + 1);

        let (shown, tooltip) = format_note(&note);

        assert_eq!(shown, format!("{}...", "👍🏽".repeat(MAX_NOTE_GRAPHEMES - 3)));
        assert_eq!(tooltip, Some(note.as_str()));
    }
}
