////////////////////////////////////////////////////////////////////////////////
// This file is a part of the "Lady Deirdre" work,                            //
// a compiler front-end foundation technology.                                //
//                                                                            //
// This work is proprietary software with source-available code.              //
//                                                                            //
// To copy, use, distribute, and contribute to this work, you must agree to   //
// the terms of the General License Agreement:                                //
//                                                                            //
// https://github.com/Eliah-Lakhin/lady-deirdre/blob/master/EULA.md.          //
//                                                                            //
// The agreement grants you a Commercial-Limited License that gives you       //
// the right to use my work in non-commercial and limited commercial products //
// with a total gross revenue cap. To remove this commercial limit for one of //
// your products, you must acquire an Unrestricted Commercial License.        //
//                                                                            //
// If you contribute to the source code, documentation, or related materials  //
// of this work, you must assign these changes to me. Contributions are       //
// governed by the "Derivative Work" section of the General License           //
// Agreement.                                                                 //
//                                                                            //
// Copying the work in parts is strictly forbidden, except as permitted under //
// the terms of the General License Agreement.                                //
//                                                                            //
// If you do not or cannot agree to the terms of this Agreement,              //
// do not use this work.                                                      //
//                                                                            //
// This work is provided "as is" without any warranties, express or implied,  //
// except to the extent that such disclaimers are held to be legally invalid. //
//                                                                            //
// Copyright (c) 2024 Ilya Lakhin (Илья Александрович Лахин).                 //
// All rights reserved.                                                       //
////////////////////////////////////////////////////////////////////////////////

use thiserror::Error;

/// An error of the grammar model detected during the ATN construction.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum GrammarError {
    #[error("rule `{0}` is defined more than once")]
    DuplicateRule(String),

    #[error("reference to undefined rule `{0}`")]
    UndefinedRule(String),

    #[error("reference to undefined token `{0}`")]
    UndefinedToken(String),

    #[error("literal {0} does not match any token")]
    UndefinedLiteral(String),

    #[error("reference to undefined mode `{0}`")]
    UndefinedMode(String),

    #[error("empty string literal in rule `{0}`")]
    EmptyLiteral(String),

    #[error("rule `{0}` negates an element that is not a set")]
    InvalidSet(String),

    #[error("rule `{0}` uses an element that is not allowed in this grammar kind")]
    MisplacedElement(String),

    #[error("left-recursive rule `{0}` must have at least one non-recursive alternative")]
    NoPrimaryAlternatives(String),

    #[error("left-recursive rule `{0}` has an alternative consisting of the recursive reference only")]
    InvalidLeftRecursion(String),

    #[error("grammar does not define any rules")]
    EmptyGrammar,
}
