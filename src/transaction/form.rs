//! The form fragment for recording a deposit or withdrawal against a goal.

use maud::{Markup, html};

use crate::{
    database_id::GoalId,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE,
        FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, field_error, loading_spinner,
    },
    transaction::TransactionKind,
    validation::ValidationErrors,
};

/// The form for appending a transaction to a savings goal.
///
/// When a submission fails validation the endpoint re-renders this fragment
/// with the user's input and the error messages filled in.
pub(crate) fn transaction_form(
    goal_id: GoalId,
    amount: &str,
    kind: Option<TransactionKind>,
    errors: &ValidationErrors,
) -> Markup {
    let post_url = endpoints::format_endpoint(endpoints::TRANSACTIONS_API, goal_id);

    html! {
        form
            hx-post=(post_url)
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            class="w-full space-y-4 md:space-y-6"
        {
            h2 class="text-xl font-bold" { "Record a Transaction" }

            div
            {
                label
                    for="amount"
                    class=(FORM_LABEL_STYLE)
                {
                    "Amount"
                }

                input
                    id="amount"
                    type="number"
                    name="amount"
                    step="0.01"
                    min="0.01"
                    placeholder="0.00"
                    required
                    autofocus
                    value=(amount)
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_error(errors.field("amount")))
            }

            div
            {
                span class=(FORM_LABEL_STYLE) { "Kind" }

                div class=(FORM_RADIO_GROUP_STYLE)
                {
                    @for option in [TransactionKind::Deposit, TransactionKind::Withdrawal] {
                        div class="flex flex-1 items-center"
                        {
                            input
                                id=(option.as_str())
                                type="radio"
                                name="kind"
                                value=(option.as_str())
                                checked[kind == Some(option)]
                                required
                                class=(FORM_RADIO_INPUT_STYLE);

                            label
                                for=(option.as_str())
                                class=(FORM_RADIO_LABEL_STYLE)
                            {
                                @match option {
                                    TransactionKind::Deposit => "Deposit",
                                    TransactionKind::Withdrawal => "Withdrawal",
                                }
                            }
                        }
                    }
                }

                (field_error(errors.field("kind")))
            }

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span
                    id="indicator"
                    class="inline htmx-indicator"
                {
                    (loading_spinner())
                }
                " Save Transaction"
            }
        }
    }
}
